//! Game catalog types and rule classification enums.
//!
//! - [`Game`] - A catalog entry as reported by the game catalog provider
//! - [`GameRef`] - A game selection resolved once and threaded through bulk operations
//! - [`GameType`], [`GameVariant`] - The classification a rule applies to

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{CatalogId, GameCode};

/// A game as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Internal surrogate key.
    pub internal_id: CatalogId,
    /// Provider-facing code. Rules reference games by this value.
    pub game_code: GameCode,
    pub name: String,
    pub provider: String,
    pub enabled: bool,
}

impl Game {
    /// Resolve this catalog entry into a [`GameRef`].
    #[must_use]
    pub fn to_ref(&self) -> GameRef {
        GameRef {
            internal_id: self.internal_id.clone(),
            code: self.game_code.clone(),
            display_name: Some(self.name.clone()).filter(|name| !name.is_empty()),
        }
    }
}

/// A resolved game selection.
///
/// Carries both identifiers so downstream code never has to re-derive the
/// provider code from the surrogate key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameRef {
    pub internal_id: CatalogId,
    pub code: GameCode,
    pub display_name: Option<String>,
}

impl From<&Game> for GameRef {
    fn from(game: &Game) -> Self {
        game.to_ref()
    }
}

/// Kind of game a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Slot,
    Sports,
    Table,
    Live,
    Crash,
    Plinko,
    Wheel,
}

impl GameType {
    /// All supported game types in display order.
    pub const ALL: [GameType; 7] = [
        Self::Slot,
        Self::Sports,
        Self::Table,
        Self::Live,
        Self::Crash,
        Self::Plinko,
        Self::Wheel,
    ];

    /// Returns the wire name as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Slot => "slot",
            Self::Sports => "sports",
            Self::Table => "table",
            Self::Live => "live",
            Self::Crash => "crash",
            Self::Plinko => "plinko",
            Self::Wheel => "wheel",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownGameType {
                value: s.to_string(),
            })
    }
}

/// Variant of a game a rule applies to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    #[default]
    Classic,
    V1,
    V2,
    Demo,
    Real,
    Mobile,
    Desktop,
}

impl GameVariant {
    /// All supported variants in display order.
    pub const ALL: [GameVariant; 7] = [
        Self::Classic,
        Self::V1,
        Self::V2,
        Self::Demo,
        Self::Real,
        Self::Mobile,
        Self::Desktop,
    ];

    /// Returns the wire name as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::Demo => "demo",
            Self::Real => "real",
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameVariant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownGameVariant {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_type_parses_case_insensitively() {
        assert_eq!("Slot".parse::<GameType>().unwrap(), GameType::Slot);
        assert_eq!(" plinko ".parse::<GameType>().unwrap(), GameType::Plinko);
    }

    #[test]
    fn game_type_rejects_unknown() {
        let err = "roulette".parse::<GameType>().unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownGameType {
                value: "roulette".into()
            }
        );
    }

    #[test]
    fn variant_wire_names_round_trip_through_serde() {
        for variant in GameVariant::ALL {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{}\"", variant.as_str()));
            let back: GameVariant = serde_json::from_str(&json).unwrap();
            assert_eq!(back, variant);
        }
    }

    #[test]
    fn variant_defaults_to_classic() {
        assert_eq!(GameVariant::default(), GameVariant::Classic);
    }

    #[test]
    fn game_ref_drops_empty_display_name() {
        let game = Game {
            internal_id: CatalogId::new("7"),
            game_code: GameCode::new("aviator"),
            name: String::new(),
            provider: "spribe".into(),
            enabled: true,
        };
        let game_ref = GameRef::from(&game);
        assert_eq!(game_ref.code.as_str(), "aviator");
        assert!(game_ref.display_name.is_none());
    }
}
