//! Remote back-office API settings.

use std::time::Duration;

use serde::Deserialize;

/// Connection settings for the remote rule store and game catalog.
///
/// An empty `base_url` selects demonstration mode. The bearer token is only
/// ever read from `HOUSEEDGE_API_TOKEN`, never from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    /// Extra attempts for idempotent list calls. Mutations are never retried.
    pub list_retry_attempts: u32,
    pub retry_backoff_ms: u64,
    #[serde(skip)]
    pub token: Option<String>,
}

impl ApiConfig {
    /// True when no remote API is configured.
    #[must_use]
    pub fn is_demonstration(&self) -> bool {
        self.base_url.trim().is_empty()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// `base_url` joined with `path`, without doubled slashes.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: 10_000,
            connect_timeout_ms: 3_000,
            list_retry_attempts: 2,
            retry_backoff_ms: 250,
            token: None,
        }
    }
}
