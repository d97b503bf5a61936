//! Bulk mutation tuning.

use serde::Deserialize;

use crate::application::bulk::BulkSettings;
use crate::domain::window::DEFAULT_WINDOW_DAYS;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    /// Rules staged between cooperative yields.
    pub yield_every: usize,
    /// Default effective window length for new rules.
    pub default_window_days: i64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            yield_every: 250,
            default_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl From<&BulkConfig> for BulkSettings {
    fn from(config: &BulkConfig) -> Self {
        Self {
            yield_every: config.yield_every,
            default_window_days: config.default_window_days,
        }
    }
}
