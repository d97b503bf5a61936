//! Back-office API data transfer objects.
//!
//! Rules travel in their domain shape ([`HouseEdgeRule`] is already the wire
//! format). Only envelopes and catalog entries need their own types.

use serde::{Deserialize, Serialize};

use crate::domain::{
    game::Game,
    id::{CatalogId, GameCode, RuleId},
    rule::HouseEdgeRule,
};

/// List responses arrive either as a flat array or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) | ListResponse::Wrapped { data: items } => items,
        }
    }
}

/// Body of `POST /house-edge-rules/bulk`.
#[derive(Debug, Serialize)]
pub struct BulkCreateRequest<'a> {
    pub rules: &'a [HouseEdgeRule],
}

/// Body of `POST /house-edge-rules/bulk-remove`.
#[derive(Debug, Serialize)]
pub struct BulkRemoveRequest<'a> {
    pub ids: &'a [RuleId],
}

/// Response of `POST /house-edge-rules/bulk-remove`.
#[derive(Debug, Deserialize)]
pub struct BulkRemoveResponse {
    pub removed: usize,
}

/// Catalog entry from `GET /games`.
#[derive(Debug, Deserialize)]
pub struct GameEntry {
    pub id: String,
    pub game_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl From<GameEntry> for Game {
    fn from(entry: GameEntry) -> Self {
        Self {
            internal_id: CatalogId::new(entry.id),
            game_code: GameCode::new(entry.game_code),
            name: entry.name,
            provider: entry.provider,
            enabled: entry.enabled,
        }
    }
}
