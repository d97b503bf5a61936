//! Outbound adapters (driven side).

pub mod connect;
pub mod http;
pub mod memory;

pub use connect::{connect_rule_store, Backend, StoreMode};
