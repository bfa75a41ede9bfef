use tracing::info;

use crate::api::ApiTransport;
use crate::error::{MavigoError, Result};
use crate::models::User;
use crate::settings::SettingsStore;
use crate::state::{Action, StateHandle};
use crate::MavigoClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeBadge {
    pub label: String,
    pub is_set: bool,
}

pub fn home_badge(user: Option<&User>) -> HomeBadge {
    match user.and_then(|u| u.home_address.as_deref()).map(str::trim) {
        Some(address) if !address.is_empty() => HomeBadge {
            label: address.to_string(),
            is_set: true,
        },
        _ => HomeBadge {
            label: "Add your home address".to_string(),
            is_set: false,
        },
    }
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    pub async fn update_home_address(&self, state: &impl StateHandle, address: &str) -> Result<User> {
        let address = address.trim();
        if address.is_empty() {
            return Err(MavigoError::Validation("Address is required.".to_string()));
        }
        let user_id = state
            .read(|s| s.user_id().map(str::to_string))
            .ok_or(MavigoError::NotLoggedIn)?;
        let _guard = self.in_flight.begin(Action::UpdateHomeAddress)?;

        self.api.update_home_address(&user_id, address).await?;
        info!(user_id, "home address updated");
        self.refresh_user(state).await
    }
}
