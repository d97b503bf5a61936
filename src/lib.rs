//! Houseedge - house-edge wager rule management.
//!
//! Maintains per-game house-edge rules (a decimal fraction plus optional bet
//! bounds and an effective window) and applies them in bulk: to a selection
//! of games, to the whole catalog, or removes them by type/variant criteria.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Rule entity, game references, criteria, form validation,
//!   and percent/fraction conversion. No I/O.
//! - **`application`** - The in-session [`HouseEdgeStore`], the
//!   [`BulkMutationEngine`], the remove-all confirmation handshake, and
//!   list queries.
//! - **`port`** - Traits for the durable rule store and the game catalog.
//! - **`adapter`** - In-memory and REST implementations of the ports, plus
//!   the operator CLI.
//! - **`infrastructure`** - Configuration loading and logging.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use houseedge::adapter::outbound::memory::{MemoryCatalog, MemoryRuleStore};
//! use houseedge::application::{BulkMutationEngine, BulkSettings};
//! use houseedge::domain::{CatalogId, Game, GameCode, RuleForm};
//!
//! # tokio_test::block_on(async {
//! let catalog = MemoryCatalog::new(vec![Game {
//!     internal_id: CatalogId::new("1"),
//!     game_code: GameCode::new("aviator"),
//!     name: "Aviator".into(),
//!     provider: "spribe".into(),
//!     enabled: true,
//! }]);
//! let mut engine = BulkMutationEngine::new(
//!     Arc::new(MemoryRuleStore::new()),
//!     Arc::new(catalog),
//!     BulkSettings::default(),
//! );
//!
//! let form = RuleForm {
//!     game_type: "crash".into(),
//!     house_edge: "3".into(),
//!     min_bet: "0.10".into(),
//!     ..Default::default()
//! };
//! let outcome = engine.apply_to_all_games(&form).await.unwrap();
//! assert_eq!(outcome.inserted(), 1);
//! assert_eq!(engine.rules()[0].house_edge.to_string(), "0.0300");
//! # });
//! ```
//!
//! [`HouseEdgeStore`]: application::HouseEdgeStore
//! [`BulkMutationEngine`]: application::BulkMutationEngine

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
