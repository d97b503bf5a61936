//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the rule engine depends on:
//! the durable rule store and the game catalog.

pub mod catalog;
pub mod store;
