//! Rule matching criteria.
//!
//! A [`Criterion`] is either [`Criterion::Any`] (wildcard) or
//! [`Criterion::Exactly`] a value. Wildcards are explicit: an empty input box
//! parses to `Any`, but code never has to guess whether an empty string was
//! meant as "match everything".
//!
//! The same [`RuleCriteria::matches`] predicate drives both the additive and
//! the destructive bulk paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::game::{GameType, GameVariant};
use super::rule::HouseEdgeRule;

/// One optional field of a criteria predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion<T> {
    /// Wildcard, accepts any value.
    #[default]
    Any,
    /// Accepts only this value.
    Exactly(T),
}

impl<T: PartialEq> Criterion<T> {
    /// Returns true if `value` satisfies this criterion.
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(expected) => expected == value,
        }
    }

    /// Returns true for the wildcard.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl<T: FromStr> Criterion<T> {
    /// Parse console input. Blank input is the wildcard.
    ///
    /// # Errors
    ///
    /// Propagates the value's parse error for non-blank input.
    pub fn parse(raw: &str) -> Result<Self, T::Err> {
        if raw.trim().is_empty() {
            return Ok(Self::Any);
        }
        raw.trim().parse().map(Self::Exactly)
    }
}

impl<T: fmt::Display> fmt::Display for Criterion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Exactly(value) => write!(f, "{value}"),
        }
    }
}

/// Predicate over a rule's game type and variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleCriteria {
    #[serde(default)]
    pub game_type: Criterion<GameType>,
    #[serde(default)]
    pub game_variant: Criterion<GameVariant>,
}

impl RuleCriteria {
    /// Criteria matching every rule.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            game_type: Criterion::Any,
            game_variant: Criterion::Any,
        }
    }

    /// Criteria on both fields.
    #[must_use]
    pub const fn exactly(game_type: GameType, game_variant: GameVariant) -> Self {
        Self {
            game_type: Criterion::Exactly(game_type),
            game_variant: Criterion::Exactly(game_variant),
        }
    }

    /// Returns true if every non-wildcard field equals the rule's field.
    #[must_use]
    pub fn matches(&self, rule: &HouseEdgeRule) -> bool {
        self.game_type.accepts(&rule.game_type) && self.game_variant.accepts(&rule.game_variant)
    }

    /// Returns true when no field constrains the match.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        self.game_type.is_any() && self.game_variant.is_any()
    }
}

impl fmt::Display for RuleCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type={}, variant={}", self.game_type, self.game_variant)
    }
}
