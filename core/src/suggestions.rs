use chrono::NaiveDate;

use crate::api::ApiTransport;
use crate::error::Result;
use crate::journey::ops::PlanForm;
use crate::models::{Suggestion, User};
use crate::settings::SettingsStore;
use crate::state::StateHandle;
use crate::MavigoClient;

pub fn suggestion_message(suggestion: &Suggestion) -> String {
    match suggestion.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => match suggestion.location_hint.as_deref() {
            Some(place) if !place.trim().is_empty() => {
                format!("Plan a trip to {} for \"{}\"?", place.trim(), suggestion.title)
            }
            _ => format!("Plan a trip for \"{}\"?", suggestion.title),
        },
    }
}

/// Search form pre-filled from home towards the task's location.
pub fn plan_form_for(suggestion: &Suggestion, user: Option<&User>) -> PlanForm {
    PlanForm {
        origin: user
            .and_then(|u| u.home_address.clone())
            .unwrap_or_default(),
        destination: suggestion
            .location_hint
            .clone()
            .unwrap_or_else(|| suggestion.title.clone()),
        departure_time: suggestion.due.clone().unwrap_or_default(),
        preferences: Default::default(),
    }
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    pub async fn load_suggestions(&self, state: &impl StateHandle, date: NaiveDate) -> Result<Vec<Suggestion>> {
        let user_id = self.task_user(state)?;
        let fetched = self
            .api
            .suggestions(&user_id, &date.format("%Y-%m-%d").to_string())
            .await
            .map_err(|e| self.flag_link_required(state, e))?;

        let mut visible = Vec::new();
        state.update(|s| {
            s.suggestions = fetched
                .into_iter()
                .filter(|x| !s.dismissed_suggestions.contains(&x.task_id))
                .collect();
            visible = s.suggestions.clone();
        });
        Ok(visible)
    }

    /// Hidden for the rest of the session.
    pub fn dismiss_suggestion(&self, state: &impl StateHandle, task_id: &str) {
        state.update(|s| {
            s.dismissed_suggestions.insert(task_id.to_string());
            s.suggestions.retain(|x| x.task_id != task_id);
        });
    }
}
