//! The house-edge rule entity.
//!
//! A [`HouseEdgeRule`] binds a house edge, optional bet bounds, and an
//! effective window to one game code for one game type/variant. The house
//! edge is always a fraction (`0.0500`), never a raw percentage.
//!
//! Duplicate active rules for the same `(game_id, game_type, game_variant)`
//! are allowed to coexist.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use houseedge::domain::form::{FormContext, RuleForm};
//! use houseedge::domain::game::GameRef;
//! use houseedge::domain::id::{CatalogId, GameCode};
//! use houseedge::domain::rule::HouseEdgeRule;
//!
//! let game = GameRef {
//!     internal_id: CatalogId::new("1"),
//!     code: GameCode::new("gates-of-olympus"),
//!     display_name: Some("Gates of Olympus".into()),
//! };
//! let form = RuleForm {
//!     game_type: "slot".into(),
//!     game_variant: "classic".into(),
//!     house_edge: "4.5".into(),
//!     ..Default::default()
//! };
//! let template = form.validate_single(&FormContext::now()).unwrap();
//! let rule = HouseEdgeRule::mint(&game, &template, Utc::now());
//!
//! assert_eq!(rule.house_edge.to_string(), "0.0450");
//! assert_eq!(rule.house_edge_display(), "4.50%");
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::form::RuleTemplate;
use super::game::{GameRef, GameType, GameVariant};
use super::id::{GameCode, RuleId};
use super::percent;
use super::window::EffectiveWindow;

/// A per-game wager rule.
///
/// Serialized with decimals as strings and timestamps as RFC3339, which is
/// also the wire shape exchanged with the rule store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseEdgeRule {
    pub id: RuleId,
    /// Provider-facing game code.
    pub game_id: GameCode,
    /// Display label; absent when the game reference was never resolved.
    #[serde(default)]
    pub game_name: Option<String>,
    pub game_type: GameType,
    pub game_variant: GameVariant,
    /// Fraction in `[0, 1)`, four decimal places.
    pub house_edge: Decimal,
    #[serde(default)]
    pub min_bet: Option<Decimal>,
    #[serde(default)]
    pub max_bet: Option<Decimal>,
    pub is_active: bool,
    pub effective_from: DateTime<Utc>,
    pub effective_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HouseEdgeRule {
    /// Mint a new rule for `game` from a validated template.
    #[must_use]
    pub fn mint(game: &GameRef, template: &RuleTemplate, now: DateTime<Utc>) -> Self {
        Self {
            id: RuleId::new(),
            game_id: game.code.clone(),
            game_name: game.display_name.clone(),
            game_type: template.game_type,
            game_variant: template.game_variant,
            house_edge: template.house_edge,
            min_bet: template.min_bet,
            max_bet: template.max_bet,
            is_active: template.is_active,
            effective_from: template.window.from,
            effective_until: template.window.until,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields from a template.
    ///
    /// Identity, game binding, and `created_at` are preserved.
    pub fn apply(&mut self, template: &RuleTemplate, now: DateTime<Utc>) {
        self.game_type = template.game_type;
        self.game_variant = template.game_variant;
        self.house_edge = template.house_edge;
        self.min_bet = template.min_bet;
        self.max_bet = template.max_bet;
        self.is_active = template.is_active;
        self.effective_from = template.window.from;
        self.effective_until = template.window.until;
        self.updated_at = now;
    }

    /// Flip the active flag.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.is_active = !self.is_active;
        self.updated_at = now;
    }

    /// House edge for display, e.g. `12.00%`.
    #[must_use]
    pub fn house_edge_display(&self) -> String {
        percent::display_percent(self.house_edge)
    }

    #[must_use]
    pub fn window(&self) -> EffectiveWindow {
        EffectiveWindow {
            from: self.effective_from,
            until: self.effective_until,
        }
    }

    /// Check the ordering invariants on bet bounds and window.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        if let (Some(min), Some(max)) = (self.min_bet, self.max_bet) {
            if min > max {
                return Err(DomainError::InvertedBetBounds { min, max });
            }
        }
        EffectiveWindow::try_new(self.effective_from, self.effective_until)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::{FormContext, RuleForm};
    use crate::domain::id::CatalogId;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap()
    }

    fn game() -> GameRef {
        GameRef {
            internal_id: CatalogId::new("11"),
            code: GameCode::new("big-bass"),
            display_name: Some("Big Bass".into()),
        }
    }

    fn template(edge: &str) -> RuleTemplate {
        RuleForm {
            game_type: "slot".into(),
            game_variant: "mobile".into(),
            house_edge: edge.into(),
            min_bet: "0.10".into(),
            max_bet: "50".into(),
            ..Default::default()
        }
        .validate_single(&FormContext::new(now(), 30))
        .unwrap()
    }

    #[test]
    fn mint_binds_game_and_template() {
        let rule = HouseEdgeRule::mint(&game(), &template("3"), now());
        assert_eq!(rule.game_id.as_str(), "big-bass");
        assert_eq!(rule.game_name.as_deref(), Some("Big Bass"));
        assert_eq!(rule.game_variant, GameVariant::Mobile);
        assert_eq!(rule.house_edge.to_string(), "0.0300");
        assert_eq!(rule.min_bet, Some(dec!(0.10)));
        assert_eq!(rule.effective_until, now() + Duration::days(30));
        assert_eq!(rule.created_at, rule.updated_at);
    }

    #[test]
    fn edit_reexpresses_percent_as_fraction() {
        let mut rule = HouseEdgeRule::mint(&game(), &template("3"), now());
        let id = rule.id.clone();
        let later = now() + Duration::minutes(5);
        rule.apply(&template("12"), later);
        assert_eq!(rule.id, id);
        assert_eq!(rule.house_edge.to_string(), "0.1200");
        assert_eq!(rule.house_edge_display(), "12.00%");
        assert_eq!(rule.created_at, now());
        assert_eq!(rule.updated_at, later);
    }

    #[test]
    fn toggle_flips_status() {
        let mut rule = HouseEdgeRule::mint(&game(), &template("3"), now());
        assert!(rule.is_active);
        rule.toggle(now());
        assert!(!rule.is_active);
    }

    #[test]
    fn invariants_catch_inverted_bounds() {
        let mut rule = HouseEdgeRule::mint(&game(), &template("3"), now());
        assert!(rule.check_invariants().is_ok());
        rule.min_bet = Some(dec!(100));
        assert!(matches!(
            rule.check_invariants(),
            Err(DomainError::InvertedBetBounds { .. })
        ));
    }

    #[test]
    fn wire_shape_uses_strings_for_decimals() {
        let rule = HouseEdgeRule::mint(&game(), &template("5"), now());
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["house_edge"], "0.0500");
        assert_eq!(json["min_bet"], "0.10");
        assert_eq!(json["game_type"], "slot");
        assert_eq!(json["effective_from"], "2026-02-01T10:00:00Z");

        let back: HouseEdgeRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }
}
