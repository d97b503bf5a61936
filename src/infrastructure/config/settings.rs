//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for the API location and for sensitive values like `HOUSEEDGE_API_TOKEN`.
//!
//! # Example
//!
//! ```no_run
//! use houseedge::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("houseedge.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::api::ApiConfig;
use super::bulk::BulkConfig;
use super::list::ListConfig;
use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "houseedge.toml";

/// Overrides `api.base_url`.
pub const API_URL_ENV: &str = "HOUSEEDGE_API_URL";

/// Supplies the API bearer token. Never read from the file.
pub const API_TOKEN_ENV: &str = "HOUSEEDGE_API_TOKEN";

/// Main application configuration.
///
/// Every section is optional; an empty file yields demonstration mode with
/// default tuning. Load from a TOML file using [`Config::load`] or parse
/// directly with [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Remote back-office API. Empty `base_url` means demonstration mode.
    pub api: ApiConfig,

    /// Bulk mutation tuning.
    pub bulk: BulkConfig,

    /// Listing defaults for `rules list`.
    pub list: ListConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Applies `HOUSEEDGE_API_URL` and `HOUSEEDGE_API_TOKEN` from the
    /// environment before validating.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., zero page size)
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults (with
    /// environment overrides applied).
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Initialize the tracing subscriber from `[logging]`.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV) {
            self.api.base_url = url;
        }
        // Token is never read from the config file
        self.api.token = lookup(API_TOKEN_ENV).filter(|token| !token.trim().is_empty());
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be 'pretty' or 'json'".to_string(),
            }
            .into());
        }

        let base_url = self.api.base_url.trim();
        if !base_url.is_empty()
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: "must start with http:// or https://".to_string(),
            }
            .into());
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.api.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.bulk.yield_every == 0 {
            return Err(ConfigError::InvalidValue {
                field: "yield_every",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.bulk.default_window_days <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_window_days",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.list.per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "per_page",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_url_and_supplies_token() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            API_URL_ENV => Some("https://override.example.com".to_string()),
            API_TOKEN_ENV => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "https://override.example.com");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
    }

    #[test]
    fn blank_token_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == API_TOKEN_ENV).then(|| "  ".to_string()));
        assert!(config.api.token.is_none());
        assert!(config.api.is_demonstration());
    }

    #[test]
    fn token_in_file_is_not_read() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://bo.example.com"
            token = "from-file"
            "#,
        )
        .unwrap();
        assert!(config.api.token.is_none());
    }
}
