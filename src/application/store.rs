//! In-session rule collection.
//!
//! [`HouseEdgeStore`] is the ordered snapshot of rules the console works
//! against. It enforces identity (no two rules share an id) everywhere, and
//! the bet-bound/window ordering invariants on every insert and on every
//! update that touches those fields. Rules loaded from the durable store
//! are taken as they are: older rules may predate the ordering checks and
//! must stay reachable so they can be fixed. Uniqueness of
//! `(game_id, game_type, game_variant)` is not enforced.

use std::collections::HashSet;

use crate::domain::{
    criteria::RuleCriteria, error::DomainError, id::RuleId, rule::HouseEdgeRule,
};
use crate::error::StoreError;

/// Ordered collection of rules in insertion order.
#[derive(Debug, Clone, Default)]
pub struct HouseEdgeStore {
    rules: Vec<HouseEdgeRule>,
}

impl HouseEdgeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with rules loaded from the durable
    /// store. Only identity is checked; see [`Self::violations`] for rules
    /// that break the ordering invariants. On error the previous contents
    /// are kept.
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate id.
    pub fn replace(&mut self, rules: Vec<HouseEdgeRule>) -> Result<(), StoreError> {
        let duplicate = {
            let mut seen = HashSet::with_capacity(rules.len());
            rules
                .iter()
                .find(|rule| !seen.insert(&rule.id))
                .map(|rule| rule.id.clone())
        };
        if let Some(id) = duplicate {
            return Err(StoreError::DuplicateId(id));
        }
        self.rules = rules;
        Ok(())
    }

    /// Rules currently violating a bet-bound or window invariant.
    #[must_use]
    pub fn violations(&self) -> Vec<(&HouseEdgeRule, DomainError)> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check_invariants().err().map(|err| (rule, err)))
            .collect()
    }

    #[must_use]
    pub fn rules(&self) -> &[HouseEdgeRule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &RuleId) -> Option<&HouseEdgeRule> {
        self.rules.iter().find(|rule| &rule.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &RuleId) -> bool {
        self.get(id).is_some()
    }

    /// Append one rule.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] or [`StoreError::Invariant`].
    pub fn insert(&mut self, rule: HouseEdgeRule) -> Result<(), StoreError> {
        if self.contains(&rule.id) {
            return Err(StoreError::DuplicateId(rule.id));
        }
        check(&rule)?;
        self.rules.push(rule);
        Ok(())
    }

    /// Append a batch. Every rule is checked before any is inserted.
    ///
    /// # Errors
    ///
    /// Returns the first duplicate id (against the store or within the
    /// batch) or invariant violation; nothing is inserted.
    pub fn insert_all(&mut self, rules: Vec<HouseEdgeRule>) -> Result<(), StoreError> {
        let mut seen: HashSet<&RuleId> = self.rules.iter().map(|rule| &rule.id).collect();
        for rule in &rules {
            if !seen.insert(&rule.id) {
                return Err(StoreError::DuplicateId(rule.id.clone()));
            }
            check(rule)?;
        }
        self.rules.extend(rules);
        Ok(())
    }

    /// Check that `rule` may replace its stored version.
    ///
    /// The ordering invariants are checked only when the bet bounds or the
    /// window differ from the stored rule, so a status flip on a rule that
    /// was loaded with inverted bounds still goes through.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::Invariant`].
    pub fn check_update(&self, rule: &HouseEdgeRule) -> Result<(), StoreError> {
        let current = self
            .get(&rule.id)
            .ok_or_else(|| StoreError::NotFound(rule.id.clone()))?;
        let bounds_changed = (current.min_bet, current.max_bet) != (rule.min_bet, rule.max_bet);
        if bounds_changed || current.window() != rule.window() {
            check(rule)?;
        }
        Ok(())
    }

    /// Replace a rule in place, keeping its position.
    ///
    /// # Errors
    ///
    /// Same as [`Self::check_update`].
    pub fn update(&mut self, rule: HouseEdgeRule) -> Result<(), StoreError> {
        self.check_update(&rule)?;
        if let Some(slot) = self.rules.iter_mut().find(|existing| existing.id == rule.id) {
            *slot = rule;
        }
        Ok(())
    }

    /// Remove a rule by id.
    pub fn remove(&mut self, id: &RuleId) -> Option<HouseEdgeRule> {
        let index = self.rules.iter().position(|rule| &rule.id == id)?;
        Some(self.rules.remove(index))
    }

    /// Remove every rule whose id is in `ids`. Returns how many were removed.
    pub fn remove_ids(&mut self, ids: &[RuleId]) -> usize {
        let doomed: HashSet<&RuleId> = ids.iter().collect();
        let before = self.rules.len();
        self.rules.retain(|rule| !doomed.contains(&rule.id));
        before - self.rules.len()
    }

    /// Ids of every rule matching `criteria`, in store order.
    #[must_use]
    pub fn matching_ids(&self, criteria: &RuleCriteria) -> Vec<RuleId> {
        self.rules
            .iter()
            .filter(|rule| criteria.matches(rule))
            .map(|rule| rule.id.clone())
            .collect()
    }
}

fn check(rule: &HouseEdgeRule) -> Result<(), StoreError> {
    rule.check_invariants()
        .map_err(|source| StoreError::Invariant {
            id: rule.id.clone(),
            source,
        })
}
