//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.
//! Avoids each test module defining its own slightly-different defaults.

use crate::application::bulk::BulkSettings;
use crate::infrastructure::config::{ApiConfig, Config};

/// Bulk settings that yield after every rule, so every yield point and
/// cancellation check is exercised.
pub fn eager_yield() -> BulkSettings {
    BulkSettings {
        yield_every: 1,
        ..BulkSettings::default()
    }
}

/// Config for an API that refuses connections, with no retries or waits.
pub fn unreachable_api() -> Config {
    Config {
        api: ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 200,
            connect_timeout_ms: 200,
            list_retry_attempts: 0,
            retry_backoff_ms: 0,
            token: None,
        },
        ..Config::default()
    }
}

/// Minimal TOML with every section present.
pub const FULL_TOML: &str = r#"
[logging]
level = "debug"
format = "json"

[api]
base_url = "https://backoffice.example.com/api"
timeout_ms = 5000
connect_timeout_ms = 1000
list_retry_attempts = 2
retry_backoff_ms = 100

[bulk]
yield_every = 50
default_window_days = 30

[list]
per_page = 25
sort_by = "house_edge"
sort_order = "asc"
"#;
