use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::ApiTransport;
use crate::settings::SettingsStore;
use crate::state::StateHandle;
use crate::tasks::TaskGate;
use crate::MavigoClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Journey,
    Tasks,
    EcoScore,
}

impl View {
    pub const ALL: [View; 3] = [View::Journey, View::Tasks, View::EcoScore];

    /// Unknown names land on the journey view.
    pub fn parse(raw: &str) -> View {
        match raw.trim().trim_matches('/').to_ascii_lowercase().as_str() {
            "tasks" => View::Tasks,
            "eco-score" | "eco" => View::EcoScore,
            _ => View::Journey,
        }
    }

    /// Only paths that name a view; `/` and strangers return `None`.
    pub fn from_path(path: &str) -> Option<View> {
        let first = path.trim_matches('/').split('/').next().unwrap_or_default();
        View::ALL.into_iter().find(|v| v.as_str() == first)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            View::Journey => "journey",
            View::Tasks => "tasks",
            View::EcoScore => "eco-score",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            View::Journey => "/journey",
            View::Tasks => "/tasks",
            View::EcoScore => "/eco-score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Journey => "Journey",
            View::Tasks => "Tasks",
            View::EcoScore => "Eco-score",
        }
    }
}

/// The URL wins when it names a view, then the persisted choice.
pub fn initial_view(url_path: &str, persisted: Option<View>) -> View {
    View::from_path(url_path)
        .or(persisted)
        .unwrap_or_default()
}

/// Data a view wants fetched when it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRefresh {
    ReloadTasks,
    FetchEcoDashboard,
    None,
}

impl ViewRefresh {
    pub fn for_view(view: View) -> Self {
        match view {
            View::Tasks => ViewRefresh::ReloadTasks,
            View::EcoScore => ViewRefresh::FetchEcoDashboard,
            View::Journey => ViewRefresh::None,
        }
    }
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    /// Persists and activates `view`, returning the refresh it calls for.
    pub fn set_view(&self, state: &impl StateHandle, view: View) -> ViewRefresh {
        self.settings.set_last_view(view);
        state.update(|s| s.view = view);
        debug!(view = view.as_str(), "view changed");
        ViewRefresh::for_view(view)
    }

    /// `set_view` plus its refresh. Refresh failures never block the switch.
    pub async fn enter_view(&self, state: &impl StateHandle, view: View) {
        match self.set_view(state, view) {
            ViewRefresh::ReloadTasks => {
                if !matches!(crate::tasks::task_gate(&state.snapshot()), TaskGate::Ready(_)) {
                    return;
                }
                if let Err(err) = self.reload_tasks(state, false).await {
                    warn!(error = %err, "task refresh on view entry failed");
                }
            }
            ViewRefresh::FetchEcoDashboard => {
                if !state.read(|s| s.is_logged_in()) {
                    return;
                }
                if let Err(err) = self.load_eco_dashboard(state).await {
                    warn!(error = %err, "eco dashboard refresh failed");
                }
            }
            ViewRefresh::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_unknown_to_journey() {
        assert_eq!(View::parse("tasks"), View::Tasks);
        assert_eq!(View::parse("/eco-score/"), View::EcoScore);
        assert_eq!(View::parse("settings"), View::Journey);
        assert_eq!(View::parse(""), View::Journey);
    }

    #[test]
    fn test_initial_view_prefers_url_then_persisted() {
        assert_eq!(initial_view("/tasks", Some(View::EcoScore)), View::Tasks);
        assert_eq!(initial_view("/", Some(View::EcoScore)), View::EcoScore);
        assert_eq!(initial_view("/unknown", None), View::Journey);
        assert_eq!(initial_view("/eco-score/history", None), View::EcoScore);
    }

    #[test]
    fn test_refresh_per_view() {
        assert_eq!(ViewRefresh::for_view(View::Tasks), ViewRefresh::ReloadTasks);
        assert_eq!(
            ViewRefresh::for_view(View::EcoScore),
            ViewRefresh::FetchEcoDashboard
        );
        assert_eq!(ViewRefresh::for_view(View::Journey), ViewRefresh::None);
    }
}
