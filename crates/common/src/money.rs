//! Fixed-precision rounding for monetary values.
//!
//! Prices are held as [`Decimal`] so that `2.005` is exactly `2.005` and the
//! midpoint rule applies to the written value, not to its nearest binary float.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for every stored price.
pub const CENT_PLACES: u32 = 2;

/// Rounds a monetary value half away from zero to two decimal places.
///
/// Applied once when a price is written. Rounding an already-rounded value
/// returns it unchanged.
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
