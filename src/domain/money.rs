//! Monetary types and base-unit conversion.
//!
//! Token quantities are integer base units (`u128`); prices and sizes are
//! exact decimals. Prices are quoted as quote base units per token base unit,
//! so `amount * price` is directly a quote base-unit amount.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Integer token quantity in base units.
pub type Amount = u128;

/// Largest scale `Decimal` can carry.
pub const MAX_DECIMALS: u32 = 28;

/// Convert a base-unit quantity to whole units with the given decimals.
///
/// Returns `None` if the value does not fit a `Decimal`.
#[must_use]
pub fn from_base_units(amount: Amount, decimals: u32) -> Option<Decimal> {
    let raw = i128::try_from(amount).ok()?;
    Decimal::try_from_i128_with_scale(raw, decimals.min(MAX_DECIMALS))
        .ok()
        .map(|d| d.normalize())
}

/// Convert whole units to base units, truncating any sub-unit remainder.
///
/// Returns `None` for negative values or on overflow.
#[must_use]
pub fn to_base_units(value: Decimal, decimals: u32) -> Option<Amount> {
    if value.is_sign_negative() {
        return None;
    }
    value
        .checked_mul(unit(decimals)?)
        .and_then(|d| d.trunc().to_u128())
}

/// One whole unit expressed in base units.
fn unit(decimals: u32) -> Option<Decimal> {
    let scale = 10i128.checked_pow(decimals)?;
    Decimal::try_from_i128_with_scale(scale, 0).ok()
}

/// Quote base units received for `amount` at `price`, truncated.
#[must_use]
pub fn quote_value(amount: Amount, price: Price) -> Option<Amount> {
    to_decimal(amount)?
        .checked_mul(price)
        .and_then(|d| d.trunc().to_u128())
}

/// Token base units bought with `quote_amount` at `price`, truncated.
#[must_use]
pub fn amount_for(quote_amount: Amount, price: Price) -> Option<Amount> {
    if price <= Decimal::ZERO {
        return None;
    }
    to_decimal(quote_amount)?
        .checked_div(price)
        .and_then(|d| d.trunc().to_u128())
}

/// Apply a slippage tolerance to an expected amount, truncated.
#[must_use]
pub fn with_slippage(expected: Amount, max_slippage: Decimal) -> Option<Amount> {
    let factor = Decimal::ONE.checked_sub(max_slippage)?;
    if factor.is_sign_negative() {
        return Some(0);
    }
    to_decimal(expected)?
        .checked_mul(factor)
        .and_then(|d| d.trunc().to_u128())
}

/// Scale a base-unit decimal figure down to whole units.
#[must_use]
pub fn whole_units(value: Decimal, decimals: u32) -> Option<Decimal> {
    value
        .checked_div(unit(decimals)?)
        .map(|d| d.normalize())
}

/// Lossless `u128` to `Decimal`, if it fits.
#[must_use]
pub fn to_decimal(amount: Amount) -> Option<Decimal> {
    let raw = i128::try_from(amount).ok()?;
    Decimal::try_from_i128_with_scale(raw, 0).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn base_unit_conversion_is_exact() {
        assert_eq!(to_base_units(dec!(0.1), 18), Some(100_000_000_000_000_000));
        assert_eq!(
            from_base_units(100_000_000_000_000_000, 18),
            Some(dec!(0.1))
        );
    }

    #[test]
    fn negative_values_have_no_base_units() {
        assert_eq!(to_base_units(dec!(-1), 18), None);
    }

    #[test]
    fn quote_value_truncates() {
        assert_eq!(quote_value(1000, dec!(1.5)), Some(1500));
        assert_eq!(quote_value(3, dec!(0.5)), Some(1));
    }

    #[test]
    fn amount_for_divides_by_price() {
        assert_eq!(amount_for(1000, dec!(0.5)), Some(2000));
        assert_eq!(amount_for(1000, dec!(0)), None);
    }

    #[test]
    fn whole_units_scales_down() {
        assert_eq!(whole_units(dec!(1500), 3), Some(dec!(1.5)));
        assert_eq!(whole_units(dec!(-160), 2), Some(dec!(-1.6)));
    }

    #[test]
    fn slippage_reduces_expected_amount() {
        assert_eq!(with_slippage(1000, dec!(0.02)), Some(980));
        assert_eq!(with_slippage(1000, dec!(0)), Some(1000));
        assert_eq!(with_slippage(1000, dec!(2)), Some(0));
    }
}
