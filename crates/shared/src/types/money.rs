//! Rounding helpers for monetary values.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts stay full-precision `Decimal` inside the domain and are rounded
//! only where they leave it (API responses, calculator results).

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole currency unit, halves away from zero.
#[must_use]
pub fn round_to_unit(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to cents, halves away from zero.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly two decimal places.
#[must_use]
pub fn format_cents(amount: Decimal) -> String {
    format!("{:.2}", round_to_cents(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_unit_midpoint() {
        assert_eq!(round_to_unit(dec!(8678.5)), dec!(8679));
        assert_eq!(round_to_unit(dec!(8678.49)), dec!(8678));
        assert_eq!(round_to_unit(dec!(-2.5)), dec!(-3));
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(dec!(10.005)), dec!(10.01));
        assert_eq!(round_to_cents(dec!(33.3333333)), dec!(33.33));
    }

    #[test]
    fn test_format_cents_pads() {
        assert_eq!(format_cents(dec!(50)), "50.00");
        assert_eq!(format_cents(dec!(12.3)), "12.30");
        assert_eq!(format_cents(dec!(0.125)), "0.13");
    }
}
