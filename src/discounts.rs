//! Discounts
//!
//! Amount computation for an applied code. Amounts are minor units; percentage products stay in
//! [`Decimal`] until the final discount figure, which is rounded half-to-even.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::codes::DiscountValue;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely represented.
    #[error("percentage calculation overflowed")]
    PercentConversion,

    /// Amount does not fit in minor units.
    #[error("amount overflowed the minor unit range")]
    Overflow,

    /// Amount has a fraction of the currency's minor unit (amount, currency code).
    #[error("{0} is more precise than {1} allows")]
    ExcessPrecision(Decimal, &'static str),
}

/// Calculate the discount in minor units for an eligible base.
///
/// # Errors
///
/// Returns an error if the percentage calculation overflows (`DiscountError::PercentConversion`)
/// or the rounded result does not fit in minor units (`DiscountError::Overflow`).
pub fn discount_minor(value: &DiscountValue<'_>, eligible_minor: i64) -> Result<i64, DiscountError> {
    match value {
        DiscountValue::Percentage {
            percent,
            max_discount,
        } => {
            let raw = percent_of_minor(*percent, eligible_minor)?;

            let capped = match max_discount {
                Some(cap) => raw.min(Decimal::from(cap.to_minor_units())),
                None => raw,
            };

            round_minor(capped)
        }
        DiscountValue::FixedAmount(amount) => Ok(amount.to_minor_units().min(eligible_minor)),
    }
}

/// Subtract a discount from a total, flooring at zero.
pub fn final_minor(total_minor: i64, discount_minor: i64) -> i64 {
    total_minor.saturating_sub(discount_minor).max(0)
}

/// Calculate `percent`% of a minor unit amount, unrounded.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the product overflows `Decimal`.
pub fn percent_of_minor(percent: Decimal, minor: i64) -> Result<Decimal, DiscountError> {
    percent
        .checked_mul(Decimal::from(minor))
        .and_then(|applied| applied.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(DiscountError::PercentConversion)
}

/// Round a fractional minor unit amount half-to-even.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the rounded value does not fit in an `i64`.
pub fn round_minor(amount: Decimal) -> Result<i64, DiscountError> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .ok_or(DiscountError::Overflow)
}

/// Convert a major unit amount (e.g. `12.50`) into minor units for a currency.
///
/// # Errors
///
/// Returns [`DiscountError::ExcessPrecision`] if the amount has a fraction of a minor unit and
/// [`DiscountError::Overflow`] if it does not fit in an `i64`.
pub fn major_to_minor(amount: Decimal, currency: &Currency) -> Result<i64, DiscountError> {
    let scale = 10i64
        .checked_pow(currency.exponent)
        .ok_or(DiscountError::Overflow)?;

    let minor = amount
        .checked_mul(Decimal::from(scale))
        .ok_or(DiscountError::Overflow)?;

    if !minor.fract().is_zero() {
        return Err(DiscountError::ExcessPrecision(
            amount,
            currency.iso_alpha_code,
        ));
    }

    minor.to_i64().ok_or(DiscountError::Overflow)
}
