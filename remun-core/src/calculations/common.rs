//! Rounding and clamping shared by the calculators and simulators.
//!
//! Calculators work on exact decimals. Rounding happens once per simulation
//! step, when a value is written into a result.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use remun_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(957.655)), dec!(957.66));
/// assert_eq!(round_half_up(dec!(957.654)), dec!(957.65));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a ratio to four decimal places (hundredths of a percent).
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use remun_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-250)), dec!(0));
/// assert_eq!(non_negative(dec!(250)), dec!(250));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
