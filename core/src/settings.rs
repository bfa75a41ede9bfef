//! Typed access to the handful of values kept across reloads.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::navigation::View;

/// Plain string storage, e.g. `window.localStorage`.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    LastView,
    UserId,
    AuthToken,
    Theme,
}

impl Setting {
    pub fn key(self) -> &'static str {
        match self {
            Setting::LastView => "mavigo.lastView",
            Setting::UserId => "mavigo.userId",
            Setting::AuthToken => "mavigo.authToken",
            Setting::Theme => "mavigo.theme",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn parse(raw: &str) -> Theme {
        match raw.trim() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }
}

#[derive(Debug, Default)]
pub struct Settings<S> {
    store: S,
}

impl<S: SettingsStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn get(&self, setting: Setting) -> Option<String> {
        self.store
            .get(setting.key())
            .filter(|v| !v.trim().is_empty())
    }

    fn set(&self, setting: Setting, value: &str) {
        self.store.set(setting.key(), value);
    }

    pub fn clear(&self, setting: Setting) {
        self.store.remove(setting.key());
    }

    pub fn last_view(&self) -> Option<View> {
        self.get(Setting::LastView).map(|v| View::parse(&v))
    }

    pub fn set_last_view(&self, view: View) {
        self.set(Setting::LastView, view.as_str());
    }

    /// Both halves or nothing.
    pub fn credentials(&self) -> Option<(String, String)> {
        Some((self.get(Setting::UserId)?, self.get(Setting::AuthToken)?))
    }

    pub fn set_credentials(&self, user_id: &str, token: &str) {
        self.set(Setting::UserId, user_id);
        self.set(Setting::AuthToken, token);
    }

    pub fn clear_token(&self) {
        self.clear(Setting::AuthToken);
    }

    /// Forgets who was logged in. Theme and last view survive.
    pub fn clear_session(&self) {
        self.clear(Setting::UserId);
        self.clear(Setting::AuthToken);
    }

    pub fn theme(&self) -> Theme {
        self.get(Setting::Theme)
            .map(|v| Theme::parse(&v))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.set(Setting::Theme, theme.as_str());
    }
}

/// In-memory store for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(Setting, &str)]) -> Self {
        let store = Self::default();
        for (setting, value) in entries {
            store.set(setting.key(), value);
        }
        store
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values().remove(key);
    }
}
