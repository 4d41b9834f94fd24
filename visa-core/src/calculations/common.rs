//! Common utility functions for cost calculations.
//!
//! This module provides the rounding and clamping helpers shared by the
//! estimator and the layers that feed and display it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to a whole number using half-up rounding.
///
/// Values exactly halfway between two whole numbers are rounded away from
/// zero, so `2.5` becomes `3`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use visa_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(2.4)), dec!(2));
/// assert_eq!(round_half_up(dec!(2.5)), dec!(3));
/// assert_eq!(round_half_up(dec!(1531.5)), dec!(1532));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value`, or zero when `value` is negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use visa_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(12.5)), dec!(12.5));
/// assert_eq!(non_negative(dec!(-3)), dec!(0));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    if value < Decimal::ZERO { Decimal::ZERO } else { value }
}

/// Converts a requested, possibly fractional, stay length into whole years.
///
/// The request is rounded half-up; negative requests become zero and
/// requests beyond `u32::MAX` saturate.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use visa_core::calculations::common::whole_years;
///
/// assert_eq!(whole_years(dec!(2.5)), 3);
/// assert_eq!(whole_years(dec!(2.49)), 2);
/// assert_eq!(whole_years(dec!(-1)), 0);
/// ```
pub fn whole_years(requested: Decimal) -> u32 {
    round_half_up(non_negative(requested))
        .to_u32()
        .unwrap_or(u32::MAX)
}
