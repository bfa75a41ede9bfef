//! The one record every feature reads and writes.
//!
//! Nothing here is global: the front-end owns an `AppState` inside a signal,
//! tests own one inside a `RefCell`, and every operation receives it through
//! [`StateHandle`].

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::error::{MavigoError, Result};
use crate::models::{ComfortSetting, EcoDashboard, Journey, Suggestion, Task, TaskList, User};
use crate::navigation::View;
use crate::notify::RouteNotifier;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub user: Option<User>,
    pub view: View,
    /// Cached pointer to the user's Google Tasks list.
    pub default_task_list: Option<TaskList>,
    pub tasks: Vec<Task>,
    current_journey: Option<Journey>,
    pub journey_results: Vec<Journey>,
    /// Shown in place of the results list, e.g. after a reroute with no alternatives.
    pub results_notice: Option<String>,
    pub eco: Option<EcoDashboard>,
    pub comfort_settings: Vec<ComfortSetting>,
    pub suggestions: Vec<Suggestion>,
    pub dismissed_suggestions: HashSet<String>,
    pub route_notice: RouteNotifier,
    /// Set when the task proxy answered with an auth-class status.
    pub link_required: bool,
}

/// Which of the two journey panels is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyPanels {
    pub current_visible: bool,
    pub results_visible: bool,
}

impl AppState {
    /// Fresh state for a signed-in user with nothing cached yet.
    pub fn for_user(user: User) -> Self {
        AppState {
            user: Some(user),
            ..AppState::default()
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn current_journey(&self) -> Option<&Journey> {
        self.current_journey.as_ref()
    }

    /// Keeps the journey only while its status is active; anything else empties the slot.
    ///
    /// Returns whether a journey is now current.
    pub fn set_current_journey(&mut self, journey: Option<Journey>) -> bool {
        self.current_journey = journey.filter(|j| j.status.is_active());
        self.current_journey.is_some()
    }

    pub fn panels(&self) -> JourneyPanels {
        let current_visible = self.current_journey.is_some();
        JourneyPanels {
            current_visible,
            results_visible: !current_visible,
        }
    }

    /// Looks a journey up among the current one and the last results.
    pub fn find_journey(&self, journey_id: &str) -> Option<&Journey> {
        self.current_journey
            .iter()
            .chain(self.journey_results.iter())
            .find(|j| j.journey_id == journey_id)
    }

    pub fn replace_user(&mut self, user: User) {
        let switched = self.user_id().is_some_and(|id| id != user.id);
        if switched {
            debug!(user_id = %user.id, "user switched, dropping cached task list");
            self.default_task_list = None;
            self.tasks.clear();
            self.suggestions.clear();
        }
        self.user = Some(user);
    }

    /// Everything that belongs to the logged-in user goes; the view returns to journeys.
    pub fn clear_session(&mut self) {
        *self = AppState::default();
    }
}

/// Injectable access to the application state.
pub trait StateHandle {
    fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R;
    fn update(&self, f: impl FnOnce(&mut AppState));

    fn snapshot(&self) -> AppState {
        self.read(AppState::clone)
    }
}

impl StateHandle for RefCell<AppState> {
    fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut AppState)) {
        f(&mut self.borrow_mut())
    }
}

/// User actions that must not run twice at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Login,
    Register,
    PlanJourney,
    StartJourney,
    CompleteJourney,
    CancelJourney,
    ReportDisruption,
    CreateTask,
    CompleteTask,
    DeleteTask,
    SaveComfortProfile,
    SaveComfortSetting,
    DeleteComfortSetting,
    UpdateHomeAddress,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Login => "login",
            Action::Register => "registration",
            Action::PlanJourney => "journey search",
            Action::StartJourney => "journey start",
            Action::CompleteJourney => "journey completion",
            Action::CancelJourney => "journey cancellation",
            Action::ReportDisruption => "disruption report",
            Action::CreateTask => "task creation",
            Action::CompleteTask => "task completion",
            Action::DeleteTask => "task deletion",
            Action::SaveComfortProfile => "comfort profile update",
            Action::SaveComfortSetting => "comfort setting update",
            Action::DeleteComfortSetting => "comfort setting deletion",
            Action::UpdateHomeAddress => "home address update",
        };
        f.write_str(name)
    }
}

/// Request-in-flight guard shared by every clone.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    pending: Arc<Mutex<HashSet<Action>>>,
}

fn lock(pending: &Mutex<HashSet<Action>>) -> MutexGuard<'_, HashSet<Action>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `action` until the returned token is dropped.
    pub fn begin(&self, action: Action) -> Result<InFlightToken> {
        if !lock(&self.pending).insert(action) {
            debug!(%action, "rejected duplicate action");
            return Err(MavigoError::Busy(action));
        }
        Ok(InFlightToken {
            action,
            pending: Arc::clone(&self.pending),
        })
    }

    pub fn is_pending(&self, action: Action) -> bool {
        lock(&self.pending).contains(&action)
    }
}

#[derive(Debug)]
pub struct InFlightToken {
    action: Action,
    pending: Arc<Mutex<HashSet<Action>>>,
}

impl InFlightToken {
    pub fn action(&self) -> Action {
        self.action
    }
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        lock(&self.pending).remove(&self.action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::JourneyStatus;

    fn journey(id: &str, status: JourneyStatus) -> Journey {
        Journey {
            journey_id: id.into(),
            status,
            ..Journey::default()
        }
    }

    #[test]
    fn test_active_journey_shows_current_panel() {
        for status in [
            JourneyStatus::Planned,
            JourneyStatus::InProgress,
            JourneyStatus::Rerouted,
        ] {
            let mut state = AppState::default();
            assert!(state.set_current_journey(Some(journey("j1", status))));
            assert_eq!(
                state.panels(),
                JourneyPanels {
                    current_visible: true,
                    results_visible: false
                }
            );
        }
    }

    #[test]
    fn test_inactive_journey_clears_slot() {
        for status in [
            JourneyStatus::Completed,
            JourneyStatus::Cancelled,
            JourneyStatus::Unknown,
        ] {
            let mut state = AppState::default();
            state.set_current_journey(Some(journey("j1", JourneyStatus::InProgress)));
            assert!(!state.set_current_journey(Some(journey("j1", status))));
            assert!(state.current_journey().is_none());
            assert!(state.panels().results_visible);
            assert!(!state.panels().current_visible);
        }

        let mut state = AppState::default();
        state.set_current_journey(None);
        assert!(state.panels().results_visible);
    }

    #[test]
    fn test_for_user_starts_without_journey() {
        let state = AppState::for_user(User {
            id: "u1".into(),
            ..User::default()
        });
        assert_eq!(state.user_id(), Some("u1"));
        assert!(state.is_logged_in());
        assert!(state.current_journey().is_none());
        assert!(state.panels().results_visible);
    }

    #[test]
    fn test_clear_session_resets_everything() {
        let mut state = AppState {
            user: Some(User {
                id: "u1".into(),
                ..User::default()
            }),
            view: View::EcoScore,
            default_task_list: Some(TaskList {
                id: "l1".into(),
                title: "Mine".into(),
            }),
            link_required: true,
            ..AppState::default()
        };
        state.set_current_journey(Some(journey("j1", JourneyStatus::Planned)));
        state.route_notice.should_notify("j1", &[crate::models::JourneyTask {
            id: Some("t1".into()),
            ..Default::default()
        }]);

        state.clear_session();
        assert_eq!(state, AppState::default());
        assert_eq!(state.view, View::Journey);
    }

    #[test]
    fn test_user_switch_drops_task_cache() {
        let mut state = AppState::default();
        state.replace_user(User {
            id: "u1".into(),
            ..User::default()
        });
        state.default_task_list = Some(TaskList {
            id: "l1".into(),
            title: String::new(),
        });
        state.replace_user(User {
            id: "u1".into(),
            email: "new@mail".into(),
            ..User::default()
        });
        assert!(state.default_task_list.is_some());

        state.replace_user(User {
            id: "u2".into(),
            ..User::default()
        });
        assert!(state.default_task_list.is_none());
    }

    #[test]
    fn test_in_flight_rejects_duplicates_until_dropped() {
        let guard = InFlight::new();
        let token = guard.begin(Action::StartJourney).unwrap();
        assert_eq!(
            guard.begin(Action::StartJourney).unwrap_err(),
            MavigoError::Busy(Action::StartJourney)
        );
        assert!(guard.begin(Action::ReportDisruption).is_ok());
        assert!(guard.is_pending(Action::StartJourney));

        drop(token);
        assert!(!guard.is_pending(Action::StartJourney));
        assert!(guard.begin(Action::StartJourney).is_ok());
    }

    #[test]
    fn test_in_flight_clones_share_pending_set() {
        let guard = InFlight::new();
        let other = guard.clone();
        let _token = guard.begin(Action::SaveComfortSetting).unwrap();
        assert!(other.begin(Action::SaveComfortSetting).is_err());
    }
}
