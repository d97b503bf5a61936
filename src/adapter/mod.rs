//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Operator CLI driving the application
//! - [`outbound`] - Rule stores and game catalogs the application drives

pub mod inbound;
pub mod outbound;
