//! Percent ↔ decimal-fraction conversion for house edges.
//!
//! Operators type house edges as percentages (`5` for 5%) but rules persist
//! a fraction (`0.0500`). Input at or below 1 is taken as an already
//! normalized fraction, so `0.05` and `5` both mean five percent.
//!
//! Malformed input degrades to zero instead of failing. This mirrors how
//! the console has always behaved and can hide typos, so every fallback is
//! logged at `warn`.
//!
//! # Examples
//!
//! ```
//! use houseedge::domain::percent::{to_fraction, to_percent};
//!
//! let fraction = to_fraction("12");
//! assert_eq!(fraction.to_string(), "0.1200");
//! assert_eq!(to_percent(fraction), "12.00");
//! ```

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Decimal places a stored fraction carries.
pub const FRACTION_DP: u32 = 4;

/// Decimal places a displayed percentage carries.
pub const PERCENT_DP: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Convert operator input into a stored house-edge fraction.
///
/// Values greater than 1 are percentages and are divided by 100. The result
/// is rounded half away from zero and carries exactly [`FRACTION_DP`] places.
/// Zero, one hundred, and negative values are all accepted as-is.
#[must_use]
pub fn to_fraction(raw: &str) -> Decimal {
    let value = parse_or_zero("house_edge", raw);
    let fraction = if value > Decimal::ONE {
        value / HUNDRED
    } else {
        value
    };
    fixed(fraction, FRACTION_DP)
}

/// Render a stored fraction as a percentage with [`PERCENT_DP`] places.
///
/// Fractions too large to scale by 100 saturate at the representable bound
/// instead of overflowing.
#[must_use]
pub fn to_percent(fraction: Decimal) -> String {
    let percent = fraction.checked_mul(HUNDRED).unwrap_or_else(|| {
        warn!(%fraction, "House edge out of range for percent display");
        fraction.saturating_mul(HUNDRED)
    });
    fixed(percent, PERCENT_DP).to_string()
}

/// Render a stored fraction for display, e.g. `12.00%`.
#[must_use]
pub fn display_percent(fraction: Decimal) -> String {
    format!("{}%", to_percent(fraction))
}

/// Parse a numeric form field, falling back to zero when malformed.
///
/// Blank input also yields zero; callers that distinguish "unset" must check
/// for blank input first.
pub fn parse_or_zero(field: &str, raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or_else(|_| {
            warn!(field, raw, "Malformed numeric input, falling back to 0");
            Decimal::ZERO
        })
}

fn fixed(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percentages_above_one_are_divided() {
        assert_eq!(to_fraction("5").to_string(), "0.0500");
        assert_eq!(to_fraction("12").to_string(), "0.1200");
        assert_eq!(to_fraction("100").to_string(), "1.0000");
    }

    #[test]
    fn fractions_at_or_below_one_pass_through() {
        assert_eq!(to_fraction("0.05").to_string(), "0.0500");
        assert_eq!(to_fraction("1").to_string(), "1.0000");
        assert_eq!(to_fraction("0").to_string(), "0.0000");
    }

    #[test]
    fn fraction_rounds_half_away_from_zero() {
        assert_eq!(to_fraction("12.345").to_string(), "0.1235");
        assert_eq!(to_fraction("0.00005").to_string(), "0.0001");
    }

    #[test]
    fn negative_values_are_not_rejected() {
        assert_eq!(to_fraction("-3").to_string(), "-3.0000");
    }

    #[test]
    fn malformed_input_falls_back_to_zero() {
        assert_eq!(to_fraction("abc"), dec!(0));
        assert_eq!(to_fraction("").to_string(), "0.0000");
    }

    #[test]
    fn scientific_notation_is_accepted() {
        assert_eq!(to_fraction("5e0").to_string(), "0.0500");
    }

    #[test]
    fn percent_has_two_places() {
        assert_eq!(to_percent(dec!(0.12)), "12.00");
        assert_eq!(to_percent(dec!(0.0525)), "5.25");
        assert_eq!(display_percent(dec!(0.1200)), "12.00%");
    }

    #[test]
    fn round_trip_for_percentages() {
        for raw in ["1.5", "2", "2.75", "5", "12.34", "49.99", "99.99", "100"] {
            let expected = fixed(Decimal::from_str(raw).unwrap(), PERCENT_DP).to_string();
            assert_eq!(to_percent(to_fraction(raw)), expected, "input {raw}");
        }
    }

    #[test]
    fn round_trip_for_fractions() {
        for raw in ["0", "0.01", "0.0525", "0.5", "0.9999", "1"] {
            let expected = fixed(Decimal::from_str(raw).unwrap(), FRACTION_DP);
            assert_eq!(to_fraction(raw), expected, "input {raw}");
        }
    }

    #[test]
    fn extreme_negative_input_saturates_on_display() {
        let fraction = to_fraction("-79228162514264337593543950335");
        assert_eq!(fraction, Decimal::MIN);
        assert_eq!(to_percent(fraction), Decimal::MIN.to_string());
        assert_eq!(to_percent(Decimal::MAX), Decimal::MAX.to_string());
    }

    #[test]
    fn parse_or_zero_handles_blank_and_garbage() {
        assert_eq!(parse_or_zero("min_bet", "  "), Decimal::ZERO);
        assert_eq!(parse_or_zero("min_bet", "1,5"), Decimal::ZERO);
        assert_eq!(parse_or_zero("min_bet", " 2.50 "), dec!(2.50));
    }
}
