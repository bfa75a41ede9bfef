//! Platform-agnostic core of the Mavigo web client.
//!
//! Everything that decides *what* the UI shows lives here; the Leptos crate
//! only renders it and supplies the browser-backed [`api::ApiTransport`] and
//! [`settings::SettingsStore`].

pub mod api;
pub mod comfort;
pub mod config;
pub mod disruption;
pub mod eco;
pub mod error;
pub mod format;
pub mod google_link;
pub mod home;
pub mod journey;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod session;
pub mod settings;
pub mod state;
pub mod suggestions;
pub mod tasks;
pub mod toast;

pub use api::{ApiClient, ApiRequest, ApiResponse, ApiTransport, Method, TransportError};
pub use config::ClientConfig;
pub use error::{ErrorContext, MavigoError, Result};
pub use journey::JourneyStatus;
pub use navigation::View;
pub use settings::{MemoryStore, Settings, SettingsStore, Theme};
pub use state::{Action, AppState, InFlight, StateHandle};

/// The API client, persisted settings and in-flight guard every operation needs.
///
/// Operations are methods spread over the feature modules; each takes the
/// state context it mutates.
pub struct MavigoClient<T, S> {
    api: ApiClient<T>,
    settings: Settings<S>,
    in_flight: InFlight,
    config: ClientConfig,
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    pub fn new(config: ClientConfig, transport: T, store: S) -> Self {
        Self {
            api: ApiClient::new(transport),
            settings: Settings::new(store),
            in_flight: InFlight::new(),
            config,
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.in_flight.is_pending(action)
    }
}
