//! Persistence port for house-edge rules.

use async_trait::async_trait;

use crate::domain::{id::RuleId, rule::HouseEdgeRule};
use crate::error::Result;

/// Durable storage for rules, local or remote.
///
/// Implementations exchange the [`HouseEdgeRule`] wire shape: decimals as
/// strings, timestamps as RFC3339. Callers never know which backend is in
/// use; the contract is identical in demonstration mode.
#[async_trait]
pub trait RuleDurabilityStore: Send + Sync {
    /// List every persisted rule.
    async fn list(&self) -> Result<Vec<HouseEdgeRule>>;

    /// Persist one new rule.
    async fn create(&self, rule: &HouseEdgeRule) -> Result<()>;

    /// Persist a batch of new rules in one call. Either all are stored or
    /// the call fails.
    async fn bulk_create(&self, rules: &[HouseEdgeRule]) -> Result<()>;

    /// Replace an existing rule. Returns false if it does not exist.
    async fn update(&self, rule: &HouseEdgeRule) -> Result<bool>;

    /// Delete a rule by ID. Returns false if it does not exist.
    async fn delete(&self, id: &RuleId) -> Result<bool>;

    /// Delete a batch of rules by ID. Returns how many were removed.
    async fn bulk_remove(&self, ids: &[RuleId]) -> Result<usize>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}
