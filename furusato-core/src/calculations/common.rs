//! Common utility functions for tax calculations.
//!
//! Every statutory truncation in the engine goes through these helpers.
//! Truncation is always toward zero, never rounding.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Unit that taxable income is truncated to before a rate is applied.
pub const TAXABLE_INCOME_UNIT: Decimal = dec!(1000);

/// Unit that a final tax amount is truncated to.
pub const TAX_AMOUNT_UNIT: Decimal = dec!(100);

/// Drops the fractional yen of a product.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use furusato_core::calculations::common::truncate_yen;
///
/// assert_eq!(truncate_yen(dec!(1858.5)), dec!(1858));
/// assert_eq!(truncate_yen(dec!(4249.9985)), dec!(4249));
/// ```
pub fn truncate_yen(value: Decimal) -> Decimal {
    value.trunc()
}

/// Truncates a value down to a multiple of `unit`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use furusato_core::calculations::common::{truncate_to_unit, TAXABLE_INCOME_UNIT};
///
/// assert_eq!(truncate_to_unit(dec!(1727606), TAXABLE_INCOME_UNIT), dec!(1727000));
/// assert_eq!(truncate_to_unit(dec!(999), TAXABLE_INCOME_UNIT), dec!(0));
/// ```
pub fn truncate_to_unit(
    value: Decimal,
    unit: Decimal,
) -> Decimal {
    (value / unit).trunc() * unit
}

/// Clamps a value at zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use furusato_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-2500)), dec!(0));
/// assert_eq!(non_negative(dec!(88500)), dec!(88500));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    if value > Decimal::ZERO { value } else { Decimal::ZERO }
}
