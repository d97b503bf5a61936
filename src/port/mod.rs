//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  (store, bulk, query)   │
//!                    └───────────┬─────────────┘
//!                                │
//!              ┌─────────────────┴─────────────────┐
//!              ▼                                   ▼
//!     ┌─────────────────┐                 ┌─────────────────┐
//!     │   Rule Store    │                 │  Game Catalog   │
//!     │ (HTTP / memory) │                 │ (HTTP / memory) │
//!     └─────────────────┘                 └─────────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`RuleDurabilityStore`] - Persistence for house-edge rules
//! - [`GameCatalogProvider`] - Read access to the game catalog

pub mod outbound;

pub use outbound::catalog::GameCatalogProvider;
pub use outbound::store::RuleDurabilityStore;
