//! Google Tasks, proxied by the backend and scoped to one default list.

use tracing::{debug, info, warn};

use crate::api::ApiTransport;
use crate::error::{MavigoError, Result};
use crate::models::{NewTask, Task, TaskList};
use crate::settings::SettingsStore;
use crate::state::{Action, AppState, StateHandle};
use crate::MavigoClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskGate {
    Ready(String),
    LoggedOut,
    NotLinked,
}

pub fn task_gate(state: &AppState) -> TaskGate {
    match &state.user {
        None => TaskGate::LoggedOut,
        Some(user) if !user.is_google_linked() => TaskGate::NotLinked,
        Some(user) => TaskGate::Ready(user.id.clone()),
    }
}

/// The create-task form as the user typed it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub notes: String,
    pub due: String,
    pub location_hint: String,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TaskForm {
    pub fn to_new_task(&self) -> Result<NewTask> {
        let title =
            non_blank(&self.title).ok_or_else(|| MavigoError::Validation("Title is required.".into()))?;
        Ok(NewTask {
            title,
            notes: non_blank(&self.notes),
            due: non_blank(&self.due),
            location_hint: non_blank(&self.location_hint),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    pub(crate) fn task_user(&self, state: &impl StateHandle) -> Result<String> {
        match state.read(task_gate) {
            TaskGate::Ready(user_id) => Ok(user_id),
            TaskGate::LoggedOut => Err(MavigoError::NotLoggedIn),
            TaskGate::NotLinked => {
                state.update(|s| s.link_required = true);
                Err(MavigoError::NotLinked)
            }
        }
    }

    /// Any auth-class answer from the proxy means the Google link must be redone.
    pub(crate) fn flag_link_required(&self, state: &impl StateHandle, err: MavigoError) -> MavigoError {
        if err.is_auth_required() {
            warn!(error = %err, "task proxy requires a new Google link");
            state.update(|s| s.link_required = true);
        }
        err
    }

    /// Cached default list, fetched on first use. `force` drops the cache first.
    pub async fn default_list(&self, state: &impl StateHandle, force: bool) -> Result<TaskList> {
        let user_id = self.task_user(state)?;
        if force {
            state.update(|s| s.default_task_list = None);
        } else if let Some(list) = state.read(|s| s.default_task_list.clone()) {
            return Ok(list);
        }

        let list = self
            .api
            .default_task_list(&user_id)
            .await
            .map_err(|e| self.flag_link_required(state, e))?;
        debug!(list_id = %list.id, "default task list cached");
        let cached = list.clone();
        state.update(|s| s.default_task_list = Some(cached));
        Ok(list)
    }

    pub async fn reload_tasks(&self, state: &impl StateHandle, force: bool) -> Result<Vec<Task>> {
        let list = self.default_list(state, force).await?;
        let user_id = self.task_user(state)?;
        let tasks = self
            .api
            .list_tasks(&user_id, &list.id)
            .await
            .map_err(|e| self.flag_link_required(state, e))?;

        let cached = tasks.clone();
        state.update(|s| {
            s.tasks = cached;
            s.link_required = false;
        });
        Ok(tasks)
    }

    /// Creates the task, reloads the list, and empties the form on success.
    pub async fn create_task(&self, state: &impl StateHandle, form: &mut TaskForm) -> Result<Task> {
        let new_task = form.to_new_task()?;
        let list = self.default_list(state, false).await?;
        let user_id = self.task_user(state)?;
        let _guard = self.in_flight.begin(Action::CreateTask)?;

        let created = self
            .api
            .create_task(&user_id, &list.id, &new_task)
            .await
            .map_err(|e| self.flag_link_required(state, e))?;
        info!(task_id = %created.id, "task created");
        form.clear();

        if let Err(err) = self.reload_tasks(state, false).await {
            warn!(error = %err, "task reload after create failed");
        }
        let inserted = created.clone();
        state.update(|s| {
            if !s.tasks.iter().any(|t| t.id == inserted.id) {
                s.tasks.push(inserted);
            }
        });
        Ok(created)
    }

    pub async fn complete_task(&self, state: &impl StateHandle, task_id: &str) -> Result<()> {
        let list = self.default_list(state, false).await?;
        let user_id = self.task_user(state)?;
        let _guard = self.in_flight.begin(Action::CompleteTask)?;

        self.api
            .complete_task(&user_id, &list.id, task_id)
            .await
            .map_err(|e| self.flag_link_required(state, e))?;
        state.update(|s| {
            if let Some(task) = s.tasks.iter_mut().find(|t| t.id == task_id) {
                task.completed = true;
                task.status = Some("completed".to_string());
            }
        });
        Ok(())
    }

    pub async fn delete_task(&self, state: &impl StateHandle, task_id: &str) -> Result<()> {
        let list = self.default_list(state, false).await?;
        let user_id = self.task_user(state)?;
        let _guard = self.in_flight.begin(Action::DeleteTask)?;

        self.api
            .delete_task(&user_id, &list.id, task_id)
            .await
            .map_err(|e| self.flag_link_required(state, e))?;
        state.update(|s| s.tasks.retain(|t| t.id != task_id));
        Ok(())
    }

    pub async fn tasks_for_journey(&self, state: &impl StateHandle, journey_id: &str) -> Result<Vec<Task>> {
        let user_id = self.task_user(state)?;
        self.api
            .tasks_for_journey(&user_id, journey_id)
            .await
            .map_err(|e| self.flag_link_required(state, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    #[test]
    fn test_gate_needs_login_and_link() {
        let mut state = AppState::default();
        assert_eq!(task_gate(&state), TaskGate::LoggedOut);

        state.user = Some(User {
            id: "u1".into(),
            ..User::default()
        });
        assert_eq!(task_gate(&state), TaskGate::NotLinked);

        if let Some(user) = state.user.as_mut() {
            user.google_account_linked_at = Some("2025-01-01T10:00:00Z".into());
        }
        assert_eq!(task_gate(&state), TaskGate::Ready("u1".into()));
    }

    #[test]
    fn test_form_requires_title_and_trims() {
        let form = TaskForm {
            title: "  ".into(),
            ..TaskForm::default()
        };
        assert!(matches!(form.to_new_task(), Err(MavigoError::Validation(_))));

        let mut form = TaskForm {
            title: " Buy stamps ".into(),
            location_hint: "La Poste".into(),
            ..TaskForm::default()
        };
        let task = form.to_new_task().unwrap();
        assert_eq!(task.title, "Buy stamps");
        assert_eq!(task.notes, None);
        assert_eq!(task.location_hint.as_deref(), Some("La Poste"));

        form.clear();
        assert_eq!(form, TaskForm::default());
    }
}
