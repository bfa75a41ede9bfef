use tracing::info;

use crate::api::ApiTransport;
use crate::error::{MavigoError, Result};
use crate::models::{ComfortProfile, ComfortSetting, DirectPathPolicy, User};
use crate::settings::SettingsStore;
use crate::state::{Action, StateHandle};
use crate::MavigoClient;

/// Badge text for the user's routing preferences.
pub fn comfort_summary(profile: Option<&ComfortProfile>) -> String {
    let Some(profile) = profile.filter(|p| !p.is_empty()) else {
        return "No comfort preferences".to_string();
    };

    let mut parts = Vec::new();
    match profile.direct_path {
        Some(DirectPathPolicy::Only) => parts.push("Direct only".to_string()),
        Some(DirectPathPolicy::Preferred) => parts.push("Direct preferred".to_string()),
        Some(DirectPathPolicy::Indifferent) | None => {}
    }
    if profile.require_air_conditioning {
        parts.push("A/C".to_string());
    }
    if let Some(n) = profile.max_nb_transfers {
        parts.push(match n {
            0 => "no transfers".to_string(),
            1 => "max 1 transfer".to_string(),
            n => format!("max {} transfers", n),
        });
    }
    if let Some(min) = profile.max_waiting_duration {
        parts.push(format!("wait ≤ {} min", min));
    }
    if let Some(min) = profile.max_walking_duration {
        parts.push(format!("walk ≤ {} min", min));
    }

    if parts.is_empty() {
        "No comfort preferences".to_string()
    } else {
        parts.join(" · ")
    }
}

/// Newcomers without a profile get asked once.
pub fn should_prompt_comfort(user: &User) -> bool {
    !user.has_seen_comfort_prompt && !matches!(&user.comfort_profile, Some(p) if !p.is_empty())
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    fn logged_in_user(&self, state: &impl StateHandle) -> Result<String> {
        state
            .read(|s| s.user_id().map(str::to_string))
            .ok_or(MavigoError::NotLoggedIn)
    }

    /// Saves the profile, or clears it server-side when nothing is set.
    pub async fn save_comfort_profile(
        &self,
        state: &impl StateHandle,
        profile: &ComfortProfile,
    ) -> Result<User> {
        let user_id = self.logged_in_user(state)?;
        let _guard = self.in_flight.begin(Action::SaveComfortProfile)?;
        if profile.is_empty() {
            self.api.clear_comfort_profile(&user_id).await?;
        } else {
            self.api.save_comfort_profile(&user_id, profile).await?;
        }
        info!(user_id, "comfort profile saved");
        self.refresh_user(state).await
    }

    pub async fn clear_comfort_profile(&self, state: &impl StateHandle) -> Result<User> {
        self.save_comfort_profile(state, &ComfortProfile::default())
            .await
    }

    pub async fn load_comfort_settings(&self, state: &impl StateHandle) -> Result<Vec<ComfortSetting>> {
        let user_id = self.logged_in_user(state)?;
        let settings = self.api.comfort_settings(&user_id).await?;
        let cached = settings.clone();
        state.update(|s| s.comfort_settings = cached);
        Ok(settings)
    }

    /// Creates the setting, or updates it in place when it already has an id.
    pub async fn save_comfort_setting(
        &self,
        state: &impl StateHandle,
        setting: &ComfortSetting,
    ) -> Result<ComfortSetting> {
        if setting.name.trim().is_empty() {
            return Err(MavigoError::Validation("Name is required.".to_string()));
        }
        let user_id = self.logged_in_user(state)?;
        let _guard = self.in_flight.begin(Action::SaveComfortSetting)?;

        let saved = match setting.id.as_deref() {
            Some(id) => self.api.update_comfort_setting(&user_id, id, setting).await?,
            None => self.api.create_comfort_setting(&user_id, setting).await?,
        };
        let stored = saved.clone();
        state.update(|s| {
            match s
                .comfort_settings
                .iter_mut()
                .find(|c| c.id.is_some() && c.id == stored.id)
            {
                Some(existing) => *existing = stored,
                None => s.comfort_settings.push(stored),
            }
        });
        Ok(saved)
    }

    pub async fn delete_comfort_setting(&self, state: &impl StateHandle, setting_id: &str) -> Result<()> {
        let user_id = self.logged_in_user(state)?;
        let _guard = self.in_flight.begin(Action::DeleteComfortSetting)?;
        self.api.delete_comfort_setting(&user_id, setting_id).await?;
        state.update(|s| {
            s.comfort_settings
                .retain(|c| c.id.as_deref() != Some(setting_id))
        });
        Ok(())
    }

    pub async fn mark_comfort_prompt_seen(&self, state: &impl StateHandle) -> Result<()> {
        let user_id = self.logged_in_user(state)?;
        self.api.mark_comfort_prompt_seen(&user_id).await?;
        state.update(|s| {
            if let Some(user) = s.user.as_mut() {
                user.has_seen_comfort_prompt = true;
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_constraints() {
        let profile = ComfortProfile {
            direct_path: Some(DirectPathPolicy::Only),
            require_air_conditioning: true,
            max_nb_transfers: Some(1),
            max_waiting_duration: None,
            max_walking_duration: Some(10),
        };
        assert_eq!(
            comfort_summary(Some(&profile)),
            "Direct only · A/C · max 1 transfer · walk ≤ 10 min"
        );
    }

    #[test]
    fn test_summary_for_missing_or_empty_profile() {
        assert_eq!(comfort_summary(None), "No comfort preferences");
        assert_eq!(
            comfort_summary(Some(&ComfortProfile::default())),
            "No comfort preferences"
        );
        let indifferent = ComfortProfile {
            direct_path: Some(DirectPathPolicy::Indifferent),
            ..ComfortProfile::default()
        };
        assert_eq!(comfort_summary(Some(&indifferent)), "No comfort preferences");
    }

    #[test]
    fn test_prompt_only_for_newcomers() {
        let mut user = User::default();
        assert!(should_prompt_comfort(&user));
        user.has_seen_comfort_prompt = true;
        assert!(!should_prompt_comfort(&user));
        user.has_seen_comfort_prompt = false;
        user.comfort_profile = Some(ComfortProfile {
            require_air_conditioning: true,
            ..ComfortProfile::default()
        });
        assert!(!should_prompt_comfort(&user));
    }
}
