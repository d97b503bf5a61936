//! Backend selection: remote API or demonstration mode.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::http::{HttpCatalog, HttpRuleStore};
use super::memory::{demonstration_catalog, demonstration_rules, MemoryRuleStore};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::outbound::{catalog::GameCatalogProvider, store::RuleDurabilityStore};

/// Which backend the engine ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Remote,
    /// In-memory store and catalog; nothing outlives the process.
    Demonstration,
}

impl StoreMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            StoreMode::Remote => "remote",
            StoreMode::Demonstration => "demonstration",
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connected durable store and catalog.
pub struct Backend {
    pub store: Arc<dyn RuleDurabilityStore>,
    pub catalog: Arc<dyn GameCatalogProvider>,
    pub mode: StoreMode,
}

impl Backend {
    /// In-memory backend seeded with the sample rules.
    #[must_use]
    pub fn demonstration() -> Self {
        Self {
            store: Arc::new(MemoryRuleStore::with_rules(demonstration_rules(Utc::now()))),
            catalog: Arc::new(demonstration_catalog()),
            mode: StoreMode::Demonstration,
        }
    }
}

/// Connect to the configured API, falling back to demonstration mode.
///
/// The remote is probed with a rule listing. A transport failure (refused
/// connection, timeout) degrades to the in-memory backend with a warning;
/// any other failure, such as an auth rejection, is returned.
///
/// # Errors
///
/// Returns the probe error when the remote answered but refused the request.
pub async fn connect_rule_store(config: &Config) -> Result<Backend> {
    if config.api.is_demonstration() {
        info!("No API configured, running in demonstration mode");
        return Ok(Backend::demonstration());
    }

    let store = HttpRuleStore::from_config(&config.api);
    match store.list().await {
        Ok(rules) => {
            info!(
                base_url = %config.api.base_url,
                rules = rules.len(),
                "Connected to remote rule store"
            );
            Ok(Backend {
                store: Arc::new(store),
                catalog: Arc::new(HttpCatalog::from_config(&config.api)),
                mode: StoreMode::Remote,
            })
        }
        Err(err) if err.is_unreachable() => {
            warn!(
                base_url = %config.api.base_url,
                error = %err,
                "Remote rule store unreachable, falling back to demonstration mode"
            );
            Ok(Backend::demonstration())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_base_url_selects_demonstration() {
        let backend = connect_rule_store(&Config::default()).await.unwrap();
        assert_eq!(backend.mode, StoreMode::Demonstration);
        assert_eq!(backend.store.backend_name(), "memory");
        assert_eq!(backend.store.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back() {
        let backend = connect_rule_store(&crate::testkit::config::unreachable_api())
            .await
            .unwrap();
        assert_eq!(backend.mode, StoreMode::Demonstration);
    }
}
