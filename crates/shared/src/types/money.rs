//! Money rounding for the settlement currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal`, and every amount that reaches
//! the ledger passes through [`round_money`] exactly once. The fee policy and
//! the posting balance check share this function, so an entry built from
//! rounded fees can never drift out of balance when it is re-checked.

use rust_decimal::{Decimal, RoundingStrategy};

/// Minor-unit scale of the settlement currency (2 decimal places).
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to [`MONEY_SCALE`] decimal places.
///
/// Uses Banker's Rounding (`MidpointNearestEven`):
/// - 0.125 → 0.12
/// - 0.135 → 0.14
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns `percent` % of `amount`, rounded with [`round_money`].
///
/// Percentages are expressed in percent units: `2.55` means 2.55 %.
#[must_use]
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    round_money(amount * percent / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_keeps_two_places() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.00));
        assert_eq!(round_money(dec!(10.015)), dec!(10.02));
        assert_eq!(round_money(dec!(10.016)), dec!(10.02));
    }

    #[test]
    fn test_percent_of_whole_percent() {
        assert_eq!(percent_of(dec!(10000), dec!(2)), dec!(200));
        assert_eq!(percent_of(dec!(1000), dec!(10)), dec!(100));
    }

    #[test]
    fn test_percent_of_fractional_percent() {
        assert_eq!(percent_of(dec!(1000), dec!(2.55)), dec!(25.50));
    }
}
