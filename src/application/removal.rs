//! Two-step confirmation for "remove all matching".
//!
//! Removing by criteria can wipe the whole store when both criteria are
//! wildcards. The engine therefore never deletes from bare criteria: the
//! caller first obtains a [`RemovalPreview`] describing the blast radius,
//! then restates the exact count to get a [`ConfirmedRemoval`].

use std::collections::HashSet;

use crate::domain::{criteria::RuleCriteria, id::RuleId};
use crate::error::BulkError;

/// What a removal would delete, computed against the current store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPreview {
    criteria: RuleCriteria,
    matched: Vec<RuleId>,
    store_size: usize,
}

impl RemovalPreview {
    pub(crate) fn new(criteria: RuleCriteria, matched: Vec<RuleId>, store_size: usize) -> Self {
        Self {
            criteria,
            matched,
            store_size,
        }
    }

    #[must_use]
    pub fn criteria(&self) -> &RuleCriteria {
        &self.criteria
    }

    /// Number of rules that would be deleted.
    #[must_use]
    pub fn count(&self) -> usize {
        self.matched.len()
    }

    /// True when the criteria are both wildcards, i.e. every rule goes.
    #[must_use]
    pub fn wipes_all(&self) -> bool {
        self.criteria.is_wildcard()
    }

    /// Operator-facing summary naming the exact count.
    #[must_use]
    pub fn describe(&self) -> String {
        let noun = if self.count() == 1 { "rule" } else { "rules" };
        if self.wipes_all() {
            format!(
                "This deletes ALL {} {noun} in the store (no type or variant filter).",
                self.count()
            )
        } else {
            format!(
                "This deletes {} {noun} matching {} ({} in store).",
                self.count(),
                self.criteria,
                self.store_size
            )
        }
    }

    /// Confirm by restating the count shown to the operator.
    ///
    /// # Errors
    ///
    /// Returns [`BulkError::ConfirmationMismatch`] when `count` differs from
    /// the previewed count.
    pub fn confirm(self, count: usize) -> Result<ConfirmedRemoval, BulkError> {
        if count != self.count() {
            return Err(BulkError::ConfirmationMismatch {
                given: count,
                expected: self.count(),
            });
        }
        Ok(ConfirmedRemoval {
            criteria: self.criteria,
            ids: self.matched,
        })
    }
}

/// A removal the operator has explicitly confirmed, pinned to the exact
/// rules that were shown.
///
/// Only obtainable through [`RemovalPreview::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedRemoval {
    criteria: RuleCriteria,
    ids: Vec<RuleId>,
}

impl ConfirmedRemoval {
    #[must_use]
    pub fn criteria(&self) -> &RuleCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// True when `current` holds exactly the confirmed rules, in any order.
    #[must_use]
    pub fn covers_exactly(&self, current: &[RuleId]) -> bool {
        let confirmed: HashSet<&RuleId> = self.ids.iter().collect();
        current.len() == self.ids.len() && current.iter().all(|id| confirmed.contains(id))
    }
}
