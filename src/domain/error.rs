//! Domain validation errors for house-edge rules.
//!
//! This module defines errors that occur when domain invariants are violated,
//! plus [`FieldErrors`], the per-field report produced by form validation.
//!
//! # Examples
//!
//! ```
//! use houseedge::domain::error::DomainError;
//! use houseedge::domain::game::GameType;
//!
//! let result = "roulette".parse::<GameType>();
//! assert!(matches!(result, Err(DomainError::UnknownGameType { .. })));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The game type is not one of the supported kinds.
    #[error("unknown game type '{value}'")]
    UnknownGameType {
        /// The rejected input.
        value: String,
    },

    /// The game variant is not one of the supported variants.
    #[error("unknown game variant '{value}'")]
    UnknownGameVariant {
        /// The rejected input.
        value: String,
    },

    /// The effective window ends before it starts.
    #[error("effective window ends at {until} before it starts at {from}")]
    InvertedWindow {
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    },

    /// The minimum bet exceeds the maximum bet.
    #[error("min bet {min} exceeds max bet {max}")]
    InvertedBetBounds { min: Decimal, max: Decimal },

    /// An effective date could not be parsed.
    #[error("invalid effective date '{value}'")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },
}

/// Per-field validation failures collected from a rule form.
///
/// Keys are form field names (`game_type`, `house_edge`, ...); values are
/// human-readable messages. Ordered so rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field. The first error per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Return the message recorded for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Return true if a field has an error.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
