//! Payment-asset amounts.
//!
//! The protocol does all arithmetic on `u64` base units with checked
//! operations. [`to_decimal`] exists for logs and events only.

use rust_decimal::Decimal;

use crate::constants::PAYMENT_DECIMALS;

/// Base units → human-readable decimal (e.g. `1_500_000` → `1.500000`).
#[must_use]
pub fn to_decimal(units: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(units), PAYMENT_DECIMALS)
}
