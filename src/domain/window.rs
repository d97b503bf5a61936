//! Effective-window parsing and defaults.
//!
//! Date inputs from the console arrive as local date-times without seconds
//! or offset (`2025-10-21T21:42`). Those are pinned to UTC by appending
//! `:00Z`; anything else must already be RFC3339.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Length of a `YYYY-MM-DDTHH:MM` local date-time.
const LOCAL_MINUTE_LEN: usize = 16;

/// Default validity span when no end date is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// Normalize a console date input into a UTC timestamp.
///
/// # Errors
///
/// Returns [`DomainError::InvalidDate`] when the input is neither a
/// minute-precision local date-time nor RFC3339.
pub fn normalize_effective(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.chars().count() == LOCAL_MINUTE_LEN {
        format!("{trimmed}:00Z")
    } else {
        trimmed.to_string()
    };
    DateTime::parse_from_rfc3339(&candidate)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidDate {
            value: raw.to_string(),
        })
}

/// The `[from, until]` interval during which a rule is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl EffectiveWindow {
    /// Build a window, rejecting one that ends before it starts.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvertedWindow`] when `until < from`.
    pub fn try_new(from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self, DomainError> {
        if until < from {
            return Err(DomainError::InvertedWindow { from, until });
        }
        Ok(Self { from, until })
    }

    /// Window starting `now` and lasting `days`.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            from: now,
            until: now + Duration::days(days),
        }
    }
}
