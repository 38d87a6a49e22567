//! Discounts
//!
//! Line-level discounts and the percentage arithmetic shared with tax calculation.
//! Percentages are applied to minor units and rounded half away from zero.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{minor_units, to_decimal};

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A percentage string could not be parsed.
    #[error("invalid percentage: {0}")]
    InvalidPercentage(String),

    /// A flat discount is in a different currency to its line (discount currency, line currency).
    #[error("discount has currency {0}, but line has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Wire discriminator for a line discount.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    /// Fixed amount off the line.
    Flat,

    /// Percentage of the line total.
    Percent,
}

/// Discount applied to a single cart line.
///
/// Discounts are not bounded: a flat discount may exceed the value of the line it is
/// attached to, and a percentage may exceed 100%. The discount is carried to the backend
/// as entered and is not netted out of the displayed subtotal.
#[derive(Debug, Copy, Clone)]
pub enum LineDiscount<'a> {
    /// Subtract a fixed amount from the line total (e.g. "₹50 off")
    Flat(Money<'a, Currency>),

    /// Take a percentage off the line total (e.g. "10% off")
    Percent(Percentage),
}

impl<'a> LineDiscount<'a> {
    /// A zero flat discount, the default for a freshly added line.
    #[must_use]
    pub fn none(currency: &'a Currency) -> Self {
        LineDiscount::Flat(Money::from_minor(0, currency))
    }

    /// Discount type as sent on the wire.
    #[must_use]
    pub fn kind(&self) -> DiscountType {
        match self {
            LineDiscount::Flat(_) => DiscountType::Flat,
            LineDiscount::Percent(_) => DiscountType::Percent,
        }
    }

    /// Discount value as sent on the wire: a major-unit amount for flat discounts, or
    /// percentage points for percentage discounts.
    #[must_use]
    pub fn value(&self) -> Decimal {
        match self {
            LineDiscount::Flat(amount) => to_decimal(amount),
            LineDiscount::Percent(percent) => (*percent) * Decimal::ONE_HUNDRED,
        }
    }

    /// Whether this discount takes nothing off.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Amount this discount takes off a line with the given total.
    ///
    /// # Errors
    ///
    /// - [`DiscountError::CurrencyMismatch`]: the flat amount is in a different currency to the
    ///   line.
    /// - [`DiscountError::PercentConversion`]: the percentage cannot be represented in minor units.
    pub fn amount_on(
        &self,
        line_total: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        match self {
            LineDiscount::Flat(amount) => {
                if amount.currency() != line_total.currency() {
                    return Err(DiscountError::CurrencyMismatch(
                        amount.currency().iso_alpha_code,
                        line_total.currency().iso_alpha_code,
                    ));
                }

                Ok(*amount)
            }
            LineDiscount::Percent(percent) => {
                let minor = percent_of_minor(percent, minor_units(line_total)?)?;

                Ok(Money::from_minor(minor, line_total.currency()))
            }
        }
    }
}

/// Calculate a percentage of a minor unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or cannot be
/// represented in minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Parse a percentage string (e.g. "18%" or "0.18") into a `Percentage`.
///
/// # Errors
///
/// Returns [`DiscountError::InvalidPercentage`] if the value is not a decimal number.
pub fn parse_percentage(s: &str) -> Result<Percentage, DiscountError> {
    let trimmed = s.trim();

    let (digits, scale) = match trimmed.strip_suffix('%') {
        Some(points) => (points.trim(), Decimal::ONE_HUNDRED),
        None => (trimmed, Decimal::ONE),
    };

    let value = digits
        .parse::<Decimal>()
        .map_err(|_err| DiscountError::InvalidPercentage(s.to_string()))?;

    let fraction = value
        .checked_div(scale)
        .ok_or_else(|| DiscountError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(fraction))
}
