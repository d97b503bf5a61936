//! Rule mutation service: single create, bulk create, apply-to-all,
//! remove-all-matching, edit, status toggle, and delete.
//!
//! Every mutation follows the same shape:
//!
//! 1. Validate the form and targets. Failures return before anything is
//!    written.
//! 2. Stage the new or changed rules in memory. Bulk staging yields to the
//!    scheduler every `yield_every` rules and honors the cancel signal.
//! 3. Commit to the durable store in one call.
//! 4. Apply the same change to the in-session [`HouseEdgeStore`].
//!
//! A durable-store failure in step 3 leaves the session store untouched.
//!
//! Apply-to-all is purely additive: games that already carry an active rule
//! for the same type/variant get another one. The count of such games is
//! reported in [`BulkOutcome::already_covered`] and logged.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::query::{ListQuery, RulePage, RuleStats};
use super::removal::{ConfirmedRemoval, RemovalPreview};
use super::store::HouseEdgeStore;
use crate::domain::{
    criteria::RuleCriteria,
    form::{FormContext, RuleForm, RuleTemplate},
    game::{GameRef, GameType, GameVariant},
    id::{CatalogId, GameCode, RuleId},
    rule::HouseEdgeRule,
    window::DEFAULT_WINDOW_DAYS,
};
use crate::error::{BulkError, Result};
use crate::port::outbound::{catalog::GameCatalogProvider, store::RuleDurabilityStore};

/// Tuning for bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkSettings {
    /// Yield to the scheduler after this many staged rules.
    pub yield_every: usize,
    /// Span of the default effective window when no end date is given.
    pub default_window_days: i64,
}

impl Default for BulkSettings {
    fn default() -> Self {
        Self {
            yield_every: 250,
            default_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Result of a bulk create or apply-to-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Ids of the inserted rules, one per target game, in target order.
    pub rule_ids: Vec<RuleId>,
    /// Targets that already had an active rule for the same type/variant.
    pub already_covered: usize,
}

impl BulkOutcome {
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.rule_ids.len()
    }
}

/// Mutation engine over the session store, backed by a durable store and
/// the game catalog.
pub struct BulkMutationEngine {
    store: HouseEdgeStore,
    durable: Arc<dyn RuleDurabilityStore>,
    catalog: Arc<dyn GameCatalogProvider>,
    settings: BulkSettings,
    cancel: Option<watch::Receiver<bool>>,
}

impl BulkMutationEngine {
    /// Create an engine with an empty session store. Call [`Self::load`] to
    /// pull existing rules.
    pub fn new(
        durable: Arc<dyn RuleDurabilityStore>,
        catalog: Arc<dyn GameCatalogProvider>,
        settings: BulkSettings,
    ) -> Self {
        Self {
            store: HouseEdgeStore::new(),
            durable,
            catalog,
            settings,
            cancel: None,
        }
    }

    /// Attach a cancel signal. While the channel holds `true`, bulk
    /// operations stop at their next yield point; send `false` to re-arm.
    #[must_use]
    pub fn with_cancel_signal(mut self, signal: watch::Receiver<bool>) -> Self {
        self.cancel = Some(signal);
        self
    }

    #[must_use]
    pub fn store(&self) -> &HouseEdgeStore {
        &self.store
    }

    #[must_use]
    pub fn rules(&self) -> &[HouseEdgeRule] {
        self.store.rules()
    }

    #[must_use]
    pub fn settings(&self) -> &BulkSettings {
        &self.settings
    }

    /// Filtered, sorted, paginated view of the session store.
    #[must_use]
    pub fn query(&self, query: &ListQuery) -> RulePage {
        query.run(self.store.rules())
    }

    /// Aggregate counters over the whole session store.
    #[must_use]
    pub fn stats(&self) -> RuleStats {
        RuleStats::collect(self.store.rules())
    }

    /// Replace the session store with the durable store's contents.
    ///
    /// Rules with inverted bet bounds or windows are kept and logged so they
    /// can be found and fixed; see [`Self::invalid_rules`].
    ///
    /// # Errors
    ///
    /// Fails if the durable store cannot be listed or returns duplicate ids;
    /// the session store is kept.
    pub async fn load(&mut self) -> Result<usize> {
        let rules = self.durable.list().await?;
        self.store.replace(rules)?;

        let invalid = self.store.violations();
        for (rule, violation) in &invalid {
            warn!(
                rule_id = %rule.id,
                game_id = %rule.game_id,
                violation = %violation,
                "Loaded rule violates an invariant"
            );
        }
        info!(
            rules = self.store.len(),
            invalid = invalid.len(),
            backend = self.durable.backend_name(),
            "Rules loaded"
        );
        Ok(self.store.len())
    }

    /// Number of session rules with inverted bet bounds or windows.
    #[must_use]
    pub fn invalid_rules(&self) -> usize {
        self.store.violations().len()
    }

    /// Resolve selected catalog ids into game references, in selection
    /// order with repeats dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BulkError::UnknownSelection`] listing every id the catalog
    /// does not know.
    pub async fn resolve_selection(&self, selected: &[CatalogId]) -> Result<Vec<GameRef>> {
        let games = self.catalog.list_games().await?;
        let by_id: HashMap<&CatalogId, &_> = games.iter().map(|g| (&g.internal_id, g)).collect();

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(selected.len());
        let mut unknown = Vec::new();
        for id in selected {
            if !seen.insert(id) {
                continue;
            }
            match by_id.get(id) {
                Some(game) => resolved.push(game.to_ref()),
                None => unknown.push(id.to_string()),
            }
        }

        if !unknown.is_empty() {
            return Err(BulkError::UnknownSelection { ids: unknown }.into());
        }
        Ok(resolved)
    }

    /// Create one rule bound to the selected game.
    ///
    /// # Errors
    ///
    /// [`BulkError::MissingGame`] without a selection, [`BulkError::Invalid`]
    /// for form errors, or the durable store's error. Nothing is written on
    /// failure.
    pub async fn create_single(
        &mut self,
        game: Option<&GameRef>,
        form: &RuleForm,
    ) -> Result<HouseEdgeRule> {
        let game = game.ok_or(BulkError::MissingGame)?;
        let now = Utc::now();
        let template = form
            .validate_single(&self.form_context(now))
            .map_err(BulkError::from)?;

        let rule = HouseEdgeRule::mint(game, &template, now);
        self.durable.create(&rule).await?;
        self.store.insert(rule.clone())?;

        info!(
            rule_id = %rule.id,
            game_id = %rule.game_id,
            game_type = %rule.game_type,
            game_variant = %rule.game_variant,
            house_edge = %rule.house_edge,
            "Rule created"
        );
        Ok(rule)
    }

    /// Create one rule per selected game from a shared template.
    ///
    /// # Errors
    ///
    /// [`BulkError::EmptyTargets`] for an empty selection,
    /// [`BulkError::Invalid`] for form errors, [`BulkError::Cancelled`] if
    /// cancelled while staging, or the durable store's error. All-or-nothing.
    pub async fn create_bulk(&mut self, games: &[GameRef], form: &RuleForm) -> Result<BulkOutcome> {
        if games.is_empty() {
            return Err(BulkError::EmptyTargets.into());
        }
        let now = Utc::now();
        let template = form
            .validate_bulk(&self.form_context(now))
            .map_err(BulkError::from)?;
        self.commit_bulk("create_bulk", games, &template, now).await
    }

    /// Create one rule for every game in the catalog.
    ///
    /// Targets the whole catalog, not a selection or filtered page, and does
    /// not skip games that already have a matching rule.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_bulk`]; an empty catalog is
    /// [`BulkError::EmptyTargets`].
    pub async fn apply_to_all_games(&mut self, form: &RuleForm) -> Result<BulkOutcome> {
        let now = Utc::now();
        let template = form
            .validate_bulk(&self.form_context(now))
            .map_err(BulkError::from)?;

        let targets: Vec<GameRef> = self
            .catalog
            .list_games()
            .await?
            .iter()
            .map(GameRef::from)
            .collect();
        if targets.is_empty() {
            return Err(BulkError::EmptyTargets.into());
        }
        debug!(
            targets = targets.len(),
            catalog = self.catalog.catalog_name(),
            "Applying rule to all games"
        );
        self.commit_bulk("apply_to_all", &targets, &template, now).await
    }

    /// Describe what removing by `criteria` would delete right now.
    #[must_use]
    pub fn preview_removal(&self, criteria: RuleCriteria) -> RemovalPreview {
        let matched = self.store.matching_ids(&criteria);
        RemovalPreview::new(criteria, matched, self.store.len())
    }

    /// Delete every rule in the store matching the confirmed criteria.
    ///
    /// The criteria are re-evaluated against the whole store (not a page).
    ///
    /// # Errors
    ///
    /// [`BulkError::StaleConfirmation`] if the set of matching rules changed
    /// since the preview, or the durable store's error. Nothing is removed
    /// on failure.
    pub async fn remove_all_matching(&mut self, confirmed: ConfirmedRemoval) -> Result<usize> {
        let criteria = *confirmed.criteria();
        let ids = self.store.matching_ids(&criteria);
        if !confirmed.covers_exactly(&ids) {
            return Err(BulkError::StaleConfirmation {
                confirmed: confirmed.count(),
                current: ids.len(),
                criteria: criteria.to_string(),
            }
            .into());
        }
        if ids.is_empty() {
            debug!(criteria = %criteria, "No rules matched removal criteria");
            return Ok(0);
        }

        let remote_removed = self.durable.bulk_remove(&ids).await?;
        if remote_removed != ids.len() {
            warn!(
                expected = ids.len(),
                removed = remote_removed,
                backend = self.durable.backend_name(),
                "Durable store removed a different number of rules than matched"
            );
        }
        let removed = self.store.remove_ids(&ids);

        if criteria.is_wildcard() {
            warn!(removed, "All rules removed");
        } else {
            info!(removed, criteria = %criteria, "Matching rules removed");
        }
        Ok(removed)
    }

    /// Edit a rule. Blank form fields keep the rule's current values; an
    /// entered percent is re-expressed as a fraction.
    ///
    /// # Errors
    ///
    /// [`BulkError::RuleNotFound`], [`BulkError::Invalid`], or the durable
    /// store's error.
    pub async fn update_rule(&mut self, id: &RuleId, form: &RuleForm) -> Result<HouseEdgeRule> {
        let now = Utc::now();
        let mut rule = self.existing(id)?.clone();
        let template = form
            .validate_edit(&rule, &self.form_context(now))
            .map_err(BulkError::from)?;
        rule.apply(&template, now);
        self.persist_update(rule).await
    }

    /// Flip a rule's active flag.
    ///
    /// # Errors
    ///
    /// [`BulkError::RuleNotFound`] or the durable store's error.
    pub async fn toggle_status(&mut self, id: &RuleId) -> Result<HouseEdgeRule> {
        let mut rule = self.existing(id)?.clone();
        rule.toggle(Utc::now());
        self.persist_update(rule).await
    }

    /// Delete a single rule.
    ///
    /// # Errors
    ///
    /// [`BulkError::RuleNotFound`] or the durable store's error.
    pub async fn delete_rule(&mut self, id: &RuleId) -> Result<HouseEdgeRule> {
        self.existing(id)?;
        if !self.durable.delete(id).await? {
            warn!(rule_id = %id, "Rule already absent from durable store");
        }
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| BulkError::RuleNotFound(id.clone()))?;
        info!(rule_id = %id, "Rule deleted");
        Ok(removed)
    }

    fn form_context(&self, now: DateTime<Utc>) -> FormContext {
        FormContext::new(now, self.settings.default_window_days)
    }

    fn existing(&self, id: &RuleId) -> std::result::Result<&HouseEdgeRule, BulkError> {
        self.store
            .get(id)
            .ok_or_else(|| BulkError::RuleNotFound(id.clone()))
    }

    async fn persist_update(&mut self, rule: HouseEdgeRule) -> Result<HouseEdgeRule> {
        self.store.check_update(&rule)?;
        if !self.durable.update(&rule).await? {
            return Err(BulkError::RuleNotFound(rule.id).into());
        }
        self.store.update(rule.clone())?;
        info!(
            rule_id = %rule.id,
            house_edge = %rule.house_edge,
            is_active = rule.is_active,
            "Rule updated"
        );
        Ok(rule)
    }

    async fn commit_bulk(
        &mut self,
        operation: &'static str,
        targets: &[GameRef],
        template: &RuleTemplate,
        now: DateTime<Utc>,
    ) -> Result<BulkOutcome> {
        let already_covered = self.count_covered(targets, template.game_type, template.game_variant);
        let staged = self.stage(targets, template, now).await?;
        let rule_ids: Vec<RuleId> = staged.iter().map(|rule| rule.id.clone()).collect();

        self.durable.bulk_create(&staged).await?;
        self.store.insert_all(staged)?;

        if already_covered > 0 {
            warn!(
                operation,
                already_covered,
                game_type = %template.game_type,
                game_variant = %template.game_variant,
                "Games already had an active rule; duplicates inserted"
            );
        }
        info!(
            operation,
            inserted = rule_ids.len(),
            house_edge = %template.house_edge,
            backend = self.durable.backend_name(),
            "Bulk rules created"
        );
        Ok(BulkOutcome {
            rule_ids,
            already_covered,
        })
    }

    async fn stage(
        &self,
        targets: &[GameRef],
        template: &RuleTemplate,
        now: DateTime<Utc>,
    ) -> std::result::Result<Vec<HouseEdgeRule>, BulkError> {
        let total = targets.len();
        let batch = self.settings.yield_every.max(1);
        let mut staged = Vec::with_capacity(total);
        self.check_cancelled(0, total)?;

        for (index, game) in targets.iter().enumerate() {
            if index > 0 && index % batch == 0 {
                tokio::task::yield_now().await;
                self.check_cancelled(staged.len(), total)?;
            }
            staged.push(HouseEdgeRule::mint(game, template, now));
        }
        Ok(staged)
    }

    fn check_cancelled(&self, staged: usize, total: usize) -> std::result::Result<(), BulkError> {
        match &self.cancel {
            Some(signal) if *signal.borrow() => {
                warn!(staged, total, "Bulk operation cancelled");
                Err(BulkError::Cancelled { staged, total })
            }
            _ => Ok(()),
        }
    }

    fn count_covered(&self, targets: &[GameRef], game_type: GameType, variant: GameVariant) -> usize {
        let covered: HashSet<&GameCode> = self
            .store
            .rules()
            .iter()
            .filter(|r| r.is_active && r.game_type == game_type && r.game_variant == variant)
            .map(|r| &r.game_id)
            .collect();
        targets
            .iter()
            .filter(|game| covered.contains(&game.code))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::{MemoryCatalog, MemoryRuleStore};
    use crate::domain::criteria::Criterion;
    use crate::testkit::domain::{form, game_ref, games};

    fn engine_with(n_games: usize) -> (BulkMutationEngine, Arc<MemoryRuleStore>) {
        let durable = Arc::new(MemoryRuleStore::new());
        let catalog = Arc::new(MemoryCatalog::new(games(n_games)));
        let engine = BulkMutationEngine::new(durable.clone(), catalog, BulkSettings::default());
        (engine, durable)
    }

    #[tokio::test]
    async fn create_single_requires_game() {
        let (mut engine, durable) = engine_with(1);
        let err = engine
            .create_single(None, &form("slot", "classic", "5", "1", "10"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Bulk(BulkError::MissingGame)));
        assert!(engine.rules().is_empty());
        assert!(durable.snapshot().is_empty());
    }

    #[tokio::test]
    async fn create_single_binds_one_rule() {
        let (mut engine, durable) = engine_with(1);
        let game = game_ref("g1");
        let rule = engine
            .create_single(Some(&game), &form("live", "v1", "2.5", "", ""))
            .await
            .unwrap();
        assert_eq!(rule.game_id.as_str(), "g1");
        assert_eq!(rule.house_edge.to_string(), "0.0250");
        assert_eq!(engine.rules().len(), 1);
        assert_eq!(durable.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn create_bulk_rejects_empty_selection() {
        let (mut engine, _) = engine_with(3);
        let err = engine
            .create_bulk(&[], &form("slot", "", "5", "1", "100"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Bulk(BulkError::EmptyTargets)));
    }

    #[tokio::test]
    async fn cancelled_signal_stops_before_commit() {
        let (tx, rx) = watch::channel(true);
        let (engine, durable) = engine_with(5);
        let mut engine = engine.with_cancel_signal(rx);
        let err = engine
            .apply_to_all_games(&form("slot", "", "5", "1", "100"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Bulk(BulkError::Cancelled { staged: 0, total: 5 })
        ));
        assert!(engine.rules().is_empty());
        assert!(durable.snapshot().is_empty());

        tx.send(false).unwrap();
        let outcome = engine
            .apply_to_all_games(&form("slot", "", "5", "1", "100"))
            .await
            .unwrap();
        assert_eq!(outcome.inserted(), 5);
    }

    #[tokio::test]
    async fn small_yield_batches_still_stage_everything() {
        let durable = Arc::new(MemoryRuleStore::new());
        let catalog = Arc::new(MemoryCatalog::new(games(7)));
        let settings = BulkSettings {
            yield_every: 2,
            ..BulkSettings::default()
        };
        let mut engine = BulkMutationEngine::new(durable, catalog, settings);
        let outcome = engine
            .apply_to_all_games(&form("wheel", "demo", "3", "1", "5"))
            .await
            .unwrap();
        assert_eq!(outcome.inserted(), 7);
    }

    #[tokio::test]
    async fn stale_confirmation_is_rejected() {
        let (mut engine, _) = engine_with(2);
        engine
            .apply_to_all_games(&form("slot", "", "5", "1", "100"))
            .await
            .unwrap();
        let criteria = RuleCriteria {
            game_type: Criterion::Exactly(GameType::Slot),
            ..RuleCriteria::any()
        };
        let confirmed = engine.preview_removal(criteria).confirm(2).unwrap();

        engine
            .create_single(Some(&game_ref("g1")), &form("slot", "v2", "1", "", ""))
            .await
            .unwrap();

        let err = engine.remove_all_matching(confirmed).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Bulk(BulkError::StaleConfirmation {
                confirmed: 2,
                current: 3,
                ..
            })
        ));
        assert_eq!(engine.rules().len(), 3);
    }

    #[tokio::test]
    async fn swapped_rule_with_same_count_is_stale() {
        let (mut engine, _) = engine_with(2);
        engine
            .apply_to_all_games(&form("slot", "", "5", "1", "100"))
            .await
            .unwrap();
        let criteria = RuleCriteria {
            game_type: Criterion::Exactly(GameType::Slot),
            ..RuleCriteria::any()
        };
        let confirmed = engine.preview_removal(criteria).confirm(2).unwrap();

        let shown = engine.rules()[0].id.clone();
        engine.delete_rule(&shown).await.unwrap();
        let unseen = engine
            .create_single(Some(&game_ref("g1")), &form("slot", "v2", "1", "", ""))
            .await
            .unwrap();

        let err = engine.remove_all_matching(confirmed).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Bulk(BulkError::StaleConfirmation {
                confirmed: 2,
                current: 2,
                ..
            })
        ));
        assert!(engine.store().get(&unseen.id).is_some());
        assert_eq!(engine.rules().len(), 2);
    }

    #[tokio::test]
    async fn unknown_selection_lists_every_missing_id() {
        let (engine, _) = engine_with(2);
        let err = engine
            .resolve_selection(&[
                CatalogId::new("id-g1"),
                CatalogId::new("nope"),
                CatalogId::new("gone"),
            ])
            .await
            .unwrap_err();
        match err {
            crate::error::Error::Bulk(BulkError::UnknownSelection { ids }) => {
                assert_eq!(ids, vec!["nope".to_string(), "gone".to_string()]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[tokio::test]
    async fn resolve_selection_drops_repeats() {
        let (engine, _) = engine_with(3);
        let refs = engine
            .resolve_selection(&[
                CatalogId::new("id-g3"),
                CatalogId::new("id-g1"),
                CatalogId::new("id-g3"),
            ])
            .await
            .unwrap();
        let codes: Vec<&str> = refs.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["g3", "g1"]);
    }
}
