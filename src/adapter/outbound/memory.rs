//! In-memory adapters for demonstration mode and tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal_macros::dec;

use crate::domain::{
    game::{Game, GameType, GameVariant},
    id::{CatalogId, RuleId},
    rule::HouseEdgeRule,
    window::DEFAULT_WINDOW_DAYS,
};
use crate::error::{Result, StoreError};
use crate::port::outbound::{catalog::GameCatalogProvider, store::RuleDurabilityStore};

/// Rule store that lives only as long as the process.
///
/// Keeps insertion order so a reload returns rules the way they were added.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: RwLock<Vec<HouseEdgeRule>>,
}

impl MemoryRuleStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with rules.
    pub fn with_rules(rules: Vec<HouseEdgeRule>) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<HouseEdgeRule> {
        self.rules.read().clone()
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

#[async_trait]
impl RuleDurabilityStore for MemoryRuleStore {
    async fn list(&self) -> Result<Vec<HouseEdgeRule>> {
        Ok(self.snapshot())
    }

    async fn create(&self, rule: &HouseEdgeRule) -> Result<()> {
        self.bulk_create(std::slice::from_ref(rule)).await
    }

    async fn bulk_create(&self, rules: &[HouseEdgeRule]) -> Result<()> {
        let mut stored = self.rules.write();
        for (index, rule) in rules.iter().enumerate() {
            let clash = stored.iter().any(|r| r.id == rule.id)
                || rules[..index].iter().any(|r| r.id == rule.id);
            if clash {
                return Err(StoreError::DuplicateId(rule.id.clone()).into());
            }
        }
        stored.extend_from_slice(rules);
        Ok(())
    }

    async fn update(&self, rule: &HouseEdgeRule) -> Result<bool> {
        let mut stored = self.rules.write();
        match stored.iter_mut().find(|r| r.id == rule.id) {
            Some(slot) => {
                *slot = rule.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &RuleId) -> Result<bool> {
        let mut stored = self.rules.write();
        let before = stored.len();
        stored.retain(|r| &r.id != id);
        Ok(stored.len() < before)
    }

    async fn bulk_remove(&self, ids: &[RuleId]) -> Result<usize> {
        let mut stored = self.rules.write();
        let before = stored.len();
        stored.retain(|r| !ids.contains(&r.id));
        Ok(before - stored.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Fixed game catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    games: RwLock<Vec<Game>>,
}

impl MemoryCatalog {
    pub fn new(games: Vec<Game>) -> Self {
        Self {
            games: RwLock::new(games),
        }
    }

    /// Add a game, e.g. to simulate the catalog changing between calls.
    pub fn push(&self, game: Game) {
        self.games.write().push(game);
    }
}

#[async_trait]
impl GameCatalogProvider for MemoryCatalog {
    async fn list_games(&self) -> Result<Vec<Game>> {
        Ok(self.games.read().clone())
    }

    fn catalog_name(&self) -> &'static str {
        "memory"
    }
}

/// Catalog used in demonstration mode when no remote catalog is configured.
pub fn demonstration_catalog() -> MemoryCatalog {
    MemoryCatalog::new(demonstration_games())
}

/// Sample rules for demonstration mode, bound to [`demonstration_catalog`]
/// games so every rule command has something to act on. Ids are fixed
/// (`demo-rule-1` ..) so they can be typed at the prompt.
pub fn demonstration_rules(now: DateTime<Utc>) -> Vec<HouseEdgeRule> {
    let samples = [
        (0, GameType::Slot, GameVariant::Classic, dec!(0.0350), dec!(0.20), dec!(500), true),
        (2, GameType::Crash, GameVariant::Classic, dec!(0.0300), dec!(0.10), dec!(100), true),
        (4, GameType::Live, GameVariant::Real, dec!(0.0270), dec!(1), dec!(5000), true),
        (5, GameType::Wheel, GameVariant::Classic, dec!(0.0450), dec!(0.10), dec!(2500), false),
    ];
    let games = demonstration_games();
    samples
        .into_iter()
        .enumerate()
        .filter_map(|(n, (index, game_type, game_variant, edge, min, max, is_active))| {
            let game = games.get(index)?;
            Some(HouseEdgeRule {
                id: RuleId::from(format!("demo-rule-{}", n + 1)),
                game_id: game.game_code.clone(),
                game_name: Some(game.name.clone()),
                game_type,
                game_variant,
                house_edge: edge,
                min_bet: Some(min),
                max_bet: Some(max),
                is_active,
                effective_from: now,
                effective_until: now + Duration::days(DEFAULT_WINDOW_DAYS),
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}

fn demonstration_games() -> Vec<Game> {
    let entries = [
        ("demo-sweet-bonanza", "Sweet Bonanza", "pragmatic"),
        ("demo-gates-of-olympus", "Gates of Olympus", "pragmatic"),
        ("demo-aviator", "Aviator", "spribe"),
        ("demo-plinko", "Plinko", "spribe"),
        ("demo-lightning-roulette", "Lightning Roulette", "evolution"),
        ("demo-crazy-time", "Crazy Time", "evolution"),
    ];
    entries
        .into_iter()
        .enumerate()
        .map(|(index, (code, name, provider))| Game {
            internal_id: CatalogId::new(format!("demo-{}", index + 1)),
            game_code: code.into(),
            name: name.to_string(),
            provider: provider.to_string(),
            enabled: true,
        })
        .collect()
}
