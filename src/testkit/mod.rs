//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`]: Builders for rules, games, and forms.
//! - [`config`]: Canonical test configurations.
//! - [`store`]: Rule stores with scripted failures.

pub mod config;
pub mod domain;
pub mod store;
