//! REST adapters for the back-office API.
//!
//! - [`client`] - Shared HTTP client with timeouts, auth, and list retries
//! - [`dto`] - Request/response shapes that differ from the domain types
//! - [`store`] - [`RuleDurabilityStore`](crate::port::outbound::store::RuleDurabilityStore) over REST
//! - [`catalog`] - [`GameCatalogProvider`](crate::port::outbound::catalog::GameCatalogProvider) over REST

pub mod catalog;
pub mod client;
pub mod dto;
pub mod store;

pub use catalog::HttpCatalog;
pub use client::ApiClient;
pub use store::HttpRuleStore;
