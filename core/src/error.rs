use thiserror::Error;

use crate::journey::JourneyStatus;
use crate::state::Action;

/// Sentence shown for every auth-class failure coming out of the task proxy.
pub const LINK_GOOGLE_TASKS_MESSAGE: &str =
    "Link your Google Tasks account to see and manage your tasks.";

/// Sentence shown when a session endpoint rejects the stored credentials.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MavigoError {
    #[error("{0}")]
    Validation(String),

    #[error("authorization required (HTTP {status})")]
    AuthRequired { status: u16 },

    #[error("request failed with status {status}: {message}")]
    Request { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{0} is already in progress")]
    Busy(Action),

    #[error("cannot move a {from} journey to {to}")]
    InvalidTransition {
        from: JourneyStatus,
        to: JourneyStatus,
    },

    #[error("you need to be logged in")]
    NotLoggedIn,

    #[error("Google Tasks is not linked")]
    NotLinked,
}

/// Where an error surfaced. Auth-class failures read differently per surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Session,
    Tasks,
    General,
}

impl MavigoError {
    /// Maps a non-2xx response to the taxonomy. 401/403/409 are auth-class.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 | 409 => MavigoError::AuthRequired { status },
            _ => {
                let trimmed = body.trim();
                let message = if trimmed.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    trimmed.to_string()
                };
                MavigoError::Request { status, message }
            }
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, MavigoError::AuthRequired { .. })
    }

    /// True when the fix is linking Google Tasks rather than retrying.
    pub fn needs_link(&self, context: ErrorContext) -> bool {
        match self {
            MavigoError::NotLinked => true,
            MavigoError::AuthRequired { .. } => context == ErrorContext::Tasks,
            _ => false,
        }
    }

    /// Text for toasts and inline messages.
    pub fn user_message(&self, context: ErrorContext) -> String {
        match (self, context) {
            (MavigoError::AuthRequired { .. }, ErrorContext::Tasks)
            | (MavigoError::NotLinked, _) => LINK_GOOGLE_TASKS_MESSAGE.to_string(),
            (MavigoError::AuthRequired { .. }, _) => LOGIN_REQUIRED_MESSAGE.to_string(),
            (MavigoError::Request { message, .. }, _) => message.clone(),
            (MavigoError::Network(_), _) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            (other, _) => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MavigoError>;
