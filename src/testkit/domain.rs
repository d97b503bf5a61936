//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for [`HouseEdgeRule`], [`Game`],
//! [`GameRef`], and [`RuleForm`] so tests focus on assertions rather than
//! construction boilerplate.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    CatalogId, Game, GameCode, GameRef, GameType, GameVariant, HouseEdgeRule, RuleForm, RuleId,
};

/// Fixed reference instant so tests are deterministic.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// An active 5% rule for `code` created at [`epoch`].
pub fn rule(code: &str, game_type: GameType, game_variant: GameVariant) -> HouseEdgeRule {
    rule_at(code, game_type, game_variant, epoch())
}

/// Like [`rule`] but created at `created_at`.
pub fn rule_at(
    code: &str,
    game_type: GameType,
    game_variant: GameVariant,
    created_at: DateTime<Utc>,
) -> HouseEdgeRule {
    HouseEdgeRule {
        id: RuleId::new(),
        game_id: GameCode::new(code),
        game_name: Some(format!("Game {code}")),
        game_type,
        game_variant,
        house_edge: Decimal::new(500, 4),
        min_bet: Some(Decimal::ONE),
        max_bet: Some(Decimal::ONE_HUNDRED),
        is_active: true,
        effective_from: created_at,
        effective_until: created_at + Duration::days(365),
        created_at,
        updated_at: created_at,
    }
}

/// A catalog entry with code `code` and internal id `id-{code}`.
pub fn game(code: &str) -> Game {
    Game {
        internal_id: CatalogId::new(format!("id-{code}")),
        game_code: GameCode::new(code),
        name: format!("Game {code}"),
        provider: "pragmatic".to_string(),
        enabled: true,
    }
}

/// Generate `n` games coded `g1`, `g2`, ..., `g{n}`.
pub fn games(n: usize) -> Vec<Game> {
    (1..=n).map(|i| game(&format!("g{i}"))).collect()
}

/// Resolved reference for [`game`]`(code)`.
pub fn game_ref(code: &str) -> GameRef {
    game(code).to_ref()
}

/// A bulk form with the given type, variant, percent, and bet bounds.
pub fn form(game_type: &str, game_variant: &str, house_edge: &str, min: &str, max: &str) -> RuleForm {
    RuleForm {
        game_type: game_type.to_string(),
        game_variant: game_variant.to_string(),
        house_edge: house_edge.to_string(),
        min_bet: min.to_string(),
        max_bet: max.to_string(),
        ..Default::default()
    }
}
