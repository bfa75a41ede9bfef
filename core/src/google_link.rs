//! Linking a Google Tasks account through a popup window.
//!
//! The popup posts `{type: "GOOGLE_TASKS_LINKED"}` back to the opener when
//! done. [`LinkWatch`] folds that message, the poll ticks and teardown into a
//! single outcome.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::api::{google_link_path, ApiTransport};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::settings::SettingsStore;
use crate::state::StateHandle;
use crate::MavigoClient;

pub const LINKED_MESSAGE_TYPE: &str = "GOOGLE_TASKS_LINKED";

pub fn link_url(config: &ClientConfig, user_id: &str) -> String {
    config.url_for(&google_link_path(user_id))
}

pub fn is_link_message(data: &Value) -> bool {
    data.get("type").and_then(Value::as_str) == Some(LINKED_MESSAGE_TYPE)
}

/// The popup ends on a backend page, so only the backend or this page may post.
pub fn is_trusted_origin(config: &ClientConfig, origin: &str, page_origin: &str) -> bool {
    if origin.is_empty() || origin == "null" {
        return false;
    }
    origin == page_origin || config.api_origin().as_deref() == Some(origin)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    PopupClosed,
    TimedOut,
    Cancelled,
}

impl LinkOutcome {
    /// Whether the account may have been linked and the user is worth re-fetching.
    pub fn may_have_linked(self) -> bool {
        matches!(self, LinkOutcome::Linked | LinkOutcome::PopupClosed)
    }
}

/// Completes exactly once; later events are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkWatch {
    poll_interval: Duration,
    timeout: Duration,
    elapsed: Duration,
    outcome: Option<LinkOutcome>,
}

impl LinkWatch {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            poll_interval: config.link_poll_interval,
            timeout: config.link_timeout,
            elapsed: Duration::ZERO,
            outcome: None,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn outcome(&self) -> Option<LinkOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    fn finish(&mut self, outcome: LinkOutcome) -> Option<LinkOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        self.outcome = Some(outcome);
        Some(outcome)
    }

    pub fn on_message(&mut self, data: &Value) -> Option<LinkOutcome> {
        if is_link_message(data) {
            self.finish(LinkOutcome::Linked)
        } else {
            None
        }
    }

    /// One poll tick, `poll_interval` after the previous one.
    pub fn on_tick(&mut self, popup_closed: bool) -> Option<LinkOutcome> {
        if self.is_finished() {
            return None;
        }
        if popup_closed {
            return self.finish(LinkOutcome::PopupClosed);
        }
        self.elapsed += self.poll_interval;
        if self.elapsed >= self.timeout {
            return self.finish(LinkOutcome::TimedOut);
        }
        None
    }

    pub fn cancel(&mut self) -> Option<LinkOutcome> {
        self.finish(LinkOutcome::Cancelled)
    }
}

impl<T: ApiTransport, S: SettingsStore> MavigoClient<T, S> {
    /// Follow-up once the watch completes. Returns whether the account is now linked.
    pub async fn finish_google_link(&self, state: &impl StateHandle, outcome: LinkOutcome) -> Result<bool> {
        if !outcome.may_have_linked() {
            return Ok(false);
        }
        let user = self.refresh_user(state).await?;
        if !user.is_google_linked() {
            return Ok(false);
        }
        info!(user_id = %user.id, "google tasks linked");
        state.update(|s| s.link_required = false);
        if let Err(err) = self.reload_tasks(state, true).await {
            warn!(error = %err, "task reload after linking failed");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn watch() -> LinkWatch {
        LinkWatch::new(&ClientConfig {
            link_poll_interval: Duration::from_secs(1),
            link_timeout: Duration::from_secs(3),
            ..ClientConfig::default()
        })
    }

    #[test]
    fn test_link_message_completes_once() {
        let mut w = watch();
        assert_eq!(w.on_message(&json!({"type": "OTHER"})), None);
        assert_eq!(
            w.on_message(&json!({"type": "GOOGLE_TASKS_LINKED"})),
            Some(LinkOutcome::Linked)
        );
        assert_eq!(w.on_tick(true), None);
        assert_eq!(w.cancel(), None);
        assert_eq!(w.outcome(), Some(LinkOutcome::Linked));
    }

    #[test]
    fn test_closed_popup_and_timeout() {
        let mut w = watch();
        assert_eq!(w.on_tick(false), None);
        assert_eq!(w.on_tick(true), Some(LinkOutcome::PopupClosed));

        let mut w = watch();
        assert_eq!(w.on_tick(false), None);
        assert_eq!(w.on_tick(false), None);
        assert_eq!(w.on_tick(false), Some(LinkOutcome::TimedOut));
    }

    #[test]
    fn test_cancel_on_teardown() {
        let mut w = watch();
        assert_eq!(w.cancel(), Some(LinkOutcome::Cancelled));
        assert!(!LinkOutcome::Cancelled.may_have_linked());
    }

    #[test]
    fn test_link_message_origin_must_be_known() {
        let config = ClientConfig::from_base_url(Some("https://api.mavigo.example")).unwrap();
        let page = "https://app.mavigo.example";
        assert!(is_trusted_origin(&config, "https://api.mavigo.example", page));
        assert!(is_trusted_origin(&config, page, page));
        assert!(!is_trusted_origin(&config, "https://evil.example", page));
        assert!(!is_trusted_origin(&config, "null", page));

        let same_origin = ClientConfig::default();
        assert!(is_trusted_origin(&same_origin, page, page));
        assert!(!is_trusted_origin(&same_origin, "https://api.mavigo.example", page));
    }

    #[test]
    fn test_link_url_uses_base() {
        let config = ClientConfig::from_base_url(Some("https://api.mavigo.example")).unwrap();
        assert_eq!(
            link_url(&config, "u1"),
            "https://api.mavigo.example/api/google/tasks/link?userId=u1"
        );
    }
}
