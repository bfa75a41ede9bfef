use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_LINK_POLL_INTERVAL: Duration = Duration::from_millis(1200);
pub const DEFAULT_LINK_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);
pub const DEFAULT_IMPORTANT_TOAST_DURATION: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API base URL must use http:// or https:// and include a host: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Empty means same-origin (`/api/...`).
    pub api_base_url: String,
    pub link_poll_interval: Duration,
    pub link_timeout: Duration,
    pub toast_duration: Duration,
    pub important_toast_duration: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            link_poll_interval: DEFAULT_LINK_POLL_INTERVAL,
            link_timeout: DEFAULT_LINK_TIMEOUT,
            toast_duration: DEFAULT_TOAST_DURATION,
            important_toast_duration: DEFAULT_IMPORTANT_TOAST_DURATION,
        }
    }
}

impl ClientConfig {
    /// Build a config for the given backend origin. `None` or blank keeps same-origin.
    pub fn from_base_url(raw: Option<&str>) -> Result<Self, ConfigError> {
        let api_base_url = match raw {
            Some(raw) => normalize_base_url(raw)?,
            None => String::new(),
        };
        Ok(Self {
            api_base_url,
            ..Self::default()
        })
    }

    /// `scheme://host[:port]` of the backend, or `None` when it is same-origin.
    pub fn api_origin(&self) -> Option<String> {
        let parsed = Url::parse(&self.api_base_url).ok()?;
        Some(parsed.origin().ascii_serialization())
    }

    /// Absolute or origin-relative URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let parsed = Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
