//! Monetary rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to two decimal places, midpoint away from zero.
///
/// # Example
///
/// ```
/// use payroll_ledger::rounding::round2;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round2(Decimal::from_str("324.645").unwrap()), Decimal::from_str("324.65").unwrap());
/// assert_eq!(round2(Decimal::from_str("-1.005").unwrap()), Decimal::from_str("-1.01").unwrap());
/// ```
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
