//! Rule stores with scripted failures.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::adapter::outbound::memory::MemoryRuleStore;
use crate::domain::{id::RuleId, rule::HouseEdgeRule};
use crate::error::{Error, Result};
use crate::port::outbound::store::RuleDurabilityStore;

/// Wraps a [`MemoryRuleStore`] and rejects writes while armed.
///
/// Reads always succeed. Every rejected write bumps [`Self::rejected`].
#[derive(Debug, Default)]
pub struct FlakyRuleStore {
    inner: MemoryRuleStore,
    failing: AtomicBool,
    rejected: AtomicUsize,
}

impl FlakyRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or stop rejecting writes.
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of writes rejected so far.
    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryRuleStore {
        &self.inner
    }

    fn guard(&self, operation: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(Error::Remote(format!("{operation} rejected by test store")));
        }
        Ok(())
    }
}

#[async_trait]
impl RuleDurabilityStore for FlakyRuleStore {
    async fn list(&self) -> Result<Vec<HouseEdgeRule>> {
        self.inner.list().await
    }

    async fn create(&self, rule: &HouseEdgeRule) -> Result<()> {
        self.guard("create")?;
        self.inner.create(rule).await
    }

    async fn bulk_create(&self, rules: &[HouseEdgeRule]) -> Result<()> {
        self.guard("bulk_create")?;
        self.inner.bulk_create(rules).await
    }

    async fn update(&self, rule: &HouseEdgeRule) -> Result<bool> {
        self.guard("update")?;
        self.inner.update(rule).await
    }

    async fn delete(&self, id: &RuleId) -> Result<bool> {
        self.guard("delete")?;
        self.inner.delete(id).await
    }

    async fn bulk_remove(&self, ids: &[RuleId]) -> Result<usize> {
        self.guard("bulk_remove")?;
        self.inner.bulk_remove(ids).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}
