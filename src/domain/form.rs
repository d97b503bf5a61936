//! Rule form values and their validation.
//!
//! A [`RuleForm`] is the raw, immutable value behind one create/edit/bulk
//! dialog. Validation is a pure function of the form and a
//! [`FormContext`]; it either yields a [`RuleTemplate`] ready to mint rules
//! from, or a [`FieldErrors`] report naming every offending field.
//!
//! Edits start from the stored rule: [`RuleForm::validate_edit`] fills every
//! blank field from the rule being edited, so only what the operator typed
//! changes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{DomainError, FieldErrors};
use super::game::{GameType, GameVariant};
use super::percent::{parse_or_zero, to_fraction};
use super::rule::HouseEdgeRule;
use super::window::{normalize_effective, EffectiveWindow, DEFAULT_WINDOW_DAYS};

const REQUIRED: &str = "is required";

/// Raw operator input for a rule.
///
/// Every numeric and enum field is kept as typed text until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleForm {
    pub game_type: String,
    pub game_variant: String,
    /// Percent (`5`) or fraction (`0.05`).
    pub house_edge: String,
    pub min_bet: String,
    pub max_bet: String,
    pub effective_from: Option<String>,
    pub effective_until: Option<String>,
    /// Defaults to active when unset.
    pub is_active: Option<bool>,
}

/// The form an edit dialog opens with: the rule's current values.
impl From<&HouseEdgeRule> for RuleForm {
    fn from(rule: &HouseEdgeRule) -> Self {
        Self {
            game_type: rule.game_type.to_string(),
            game_variant: rule.game_variant.to_string(),
            house_edge: rule.house_edge.to_string(),
            min_bet: rule.min_bet.map(|v| v.to_string()).unwrap_or_default(),
            max_bet: rule.max_bet.map(|v| v.to_string()).unwrap_or_default(),
            effective_from: Some(rule.effective_from.to_rfc3339()),
            effective_until: Some(rule.effective_until.to_rfc3339()),
            is_active: Some(rule.is_active),
        }
    }
}

/// Validation inputs that are not part of the form itself.
#[derive(Debug, Clone, Copy)]
pub struct FormContext {
    pub now: DateTime<Utc>,
    pub default_window_days: i64,
}

impl FormContext {
    #[must_use]
    pub fn new(now: DateTime<Utc>, default_window_days: i64) -> Self {
        Self {
            now,
            default_window_days,
        }
    }

    /// Context anchored at the current time with the default window span.
    #[must_use]
    pub fn now() -> Self {
        Self::new(Utc::now(), DEFAULT_WINDOW_DAYS)
    }
}

/// Validated rule fields shared by every rule minted from one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTemplate {
    pub game_type: GameType,
    pub game_variant: GameVariant,
    /// Stored fraction, four decimal places.
    pub house_edge: Decimal,
    pub min_bet: Option<Decimal>,
    pub max_bet: Option<Decimal>,
    pub window: EffectiveWindow,
    pub is_active: bool,
}

/// Which fields a dialog insists on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirements {
    /// Single create and edit: type and variant.
    Single,
    /// Bulk create and apply-to-all: type, house edge, min bet. Variant
    /// falls back to classic.
    Bulk,
}

impl RuleForm {
    /// Validate for single create or edit.
    ///
    /// # Errors
    ///
    /// Returns every field error found.
    pub fn validate_single(&self, ctx: &FormContext) -> Result<RuleTemplate, FieldErrors> {
        self.validate(Requirements::Single, ctx)
    }

    /// Validate for bulk create or apply-to-all.
    ///
    /// # Errors
    ///
    /// Returns every field error found.
    pub fn validate_bulk(&self, ctx: &FormContext) -> Result<RuleTemplate, FieldErrors> {
        self.validate(Requirements::Bulk, ctx)
    }

    /// Validate an edit of `rule`. Blank fields keep the rule's current
    /// values; an omitted house edge keeps the stored fraction untouched.
    ///
    /// # Errors
    ///
    /// Returns every field error found in the merged form, including
    /// inverted bounds carried over from the stored rule.
    pub fn validate_edit(
        &self,
        rule: &HouseEdgeRule,
        ctx: &FormContext,
    ) -> Result<RuleTemplate, FieldErrors> {
        let mut template = self
            .overlay(RuleForm::from(rule))
            .validate(Requirements::Single, ctx)?;
        if blank(&self.house_edge) {
            template.house_edge = rule.house_edge;
        }
        Ok(template)
    }

    /// Every blank field of `self` taken from `base`.
    #[must_use]
    pub fn overlay(&self, base: RuleForm) -> RuleForm {
        let pick = |entered: &str, fallback: String| {
            if blank(entered) {
                fallback
            } else {
                entered.to_string()
            }
        };
        let pick_date = |entered: &Option<String>, fallback: Option<String>| {
            entered
                .clone()
                .filter(|value| !blank(value))
                .or(fallback)
        };
        RuleForm {
            game_type: pick(&self.game_type, base.game_type),
            game_variant: pick(&self.game_variant, base.game_variant),
            house_edge: pick(&self.house_edge, base.house_edge),
            min_bet: pick(&self.min_bet, base.min_bet),
            max_bet: pick(&self.max_bet, base.max_bet),
            effective_from: pick_date(&self.effective_from, base.effective_from),
            effective_until: pick_date(&self.effective_until, base.effective_until),
            is_active: self.is_active.or(base.is_active),
        }
    }

    fn validate(
        &self,
        requirements: Requirements,
        ctx: &FormContext,
    ) -> Result<RuleTemplate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let game_type = match self.game_type.trim() {
            "" => {
                errors.add("game_type", REQUIRED);
                None
            }
            raw => raw
                .parse::<GameType>()
                .map_err(|e| errors.add("game_type", e.to_string()))
                .ok(),
        };

        let game_variant = match (self.game_variant.trim(), requirements) {
            ("", Requirements::Bulk) => Some(GameVariant::Classic),
            ("", Requirements::Single) => {
                errors.add("game_variant", REQUIRED);
                None
            }
            (raw, _) => raw
                .parse::<GameVariant>()
                .map_err(|e| errors.add("game_variant", e.to_string()))
                .ok(),
        };

        if requirements == Requirements::Bulk {
            if blank(&self.house_edge) {
                errors.add("house_edge", REQUIRED);
            }
            if blank(&self.min_bet) {
                errors.add("min_bet", REQUIRED);
            }
        }

        let house_edge = to_fraction(&self.house_edge);
        let min_bet = optional_amount("min_bet", &self.min_bet);
        let max_bet = optional_amount("max_bet", &self.max_bet);
        if let (Some(min), Some(max)) = (min_bet, max_bet) {
            if min > max {
                errors.add("max_bet", DomainError::InvertedBetBounds { min, max }.to_string());
            }
        }

        let from = parse_date(&mut errors, "effective_from", self.effective_from.as_deref());
        let until = parse_date(&mut errors, "effective_until", self.effective_until.as_deref());
        let defaults = EffectiveWindow::starting_at(ctx.now, ctx.default_window_days);
        let window = match (from, until) {
            (Ok(from), Ok(until)) => {
                let from = from.unwrap_or(defaults.from);
                let until = until.unwrap_or(defaults.until);
                EffectiveWindow::try_new(from, until)
                    .map_err(|e| errors.add("effective_until", e.to_string()))
                    .ok()
            }
            _ => None,
        };

        match (game_type, game_variant, window) {
            (Some(game_type), Some(game_variant), Some(window)) if errors.is_empty() => {
                Ok(RuleTemplate {
                    game_type,
                    game_variant,
                    house_edge,
                    min_bet,
                    max_bet,
                    window,
                    is_active: self.is_active.unwrap_or(true),
                })
            }
            _ => Err(errors),
        }
    }
}

fn blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

fn optional_amount(field: &'static str, raw: &str) -> Option<Decimal> {
    if blank(raw) {
        None
    } else {
        Some(parse_or_zero(field, raw))
    }
}

/// `Ok(None)` for absent or blank input, `Err(())` after recording an error.
fn parse_date(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ()> {
    match raw.filter(|value| !blank(value)) {
        None => Ok(None),
        Some(value) => normalize_effective(value).map(Some).map_err(|e| {
            errors.add(field, e.to_string());
        }),
    }
}
