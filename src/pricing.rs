//! Pricing
//!
//! Derives the monetary totals shown at the counter from a set of cart lines:
//!
//! - `subtotal` is the sum of `unit price × quantity` over every line. Line discounts are
//!   tracked but not netted out here; they travel with the submitted payload instead.
//! - `tax` is `subtotal × tax rate`.
//! - `total_before_discount` is `subtotal + tax`.
//! - `grand_total` is `total_before_discount − bill discount`, clamped at zero.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::{
    discounts::{DiscountError, percent_of_minor},
    items::CartLine,
};

/// Errors that can occur while calculating totals.
#[derive(Debug, Error)]
pub enum TotalPriceError {
    /// The bill-level discount was negative.
    #[error("bill discount cannot be negative")]
    NegativeBillDiscount,

    /// A line total did not fit in minor units.
    #[error("line total for {0} overflowed")]
    Overflow(String),

    /// A line is priced in a different currency to the cart (part number, line currency, cart
    /// currency).
    #[error("line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Errors bubbled up from discount or tax percentage calculation.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Flat tax rate applied to the whole subtotal.
#[derive(Debug, Copy, Clone)]
pub struct TaxRate(Percentage);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    #[must_use]
    pub fn new(rate: Percentage) -> Self {
        Self(rate)
    }

    /// The standard 18% rate charged on counter sales.
    #[must_use]
    pub fn standard() -> Self {
        Self(Percentage::from(Decimal::new(18, 2)))
    }

    /// A zero rate.
    #[must_use]
    pub fn zero() -> Self {
        Self(Percentage::from(Decimal::ZERO))
    }

    /// The rate as a percentage.
    #[must_use]
    pub fn percentage(&self) -> Percentage {
        self.0
    }

    /// The rate in percentage points, e.g. `18` for 18%.
    #[must_use]
    pub fn points(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// Tax due on an amount.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentConversion`] if the amount or the tax on it cannot be
    /// represented in minor units.
    pub fn tax_on<'a>(
        &self,
        amount: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let minor = percent_of_minor(&self.0, minor_units(amount)?)?;

        Ok(Money::from_minor(minor, amount.currency()))
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::standard()
    }
}

/// Totals derived from a cart and a bill-level discount.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Totals<'a> {
    /// Sum of `unit price × quantity` over all lines.
    pub subtotal: Money<'a, Currency>,

    /// Tax on the subtotal.
    pub tax: Money<'a, Currency>,

    /// Subtotal plus tax.
    pub total_before_discount: Money<'a, Currency>,

    /// Bill-level discount taken off the taxed total.
    pub bill_discount: Money<'a, Currency>,

    /// Amount due, never negative.
    pub grand_total: Money<'a, Currency>,

    /// Sum of every line's discount amount. Informational only: these are applied by the
    /// backend on the submitted payload and are not part of `grand_total`.
    pub line_discounts: Money<'a, Currency>,
}

/// Calculates the total of `unit price × quantity` over a list of lines.
///
/// An empty list totals zero in the given currency.
///
/// # Errors
///
/// - [`TotalPriceError::CurrencyMismatch`]: a line is priced in another currency.
/// - [`TotalPriceError::Overflow`]: a line total does not fit in minor units.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic error.
pub fn total_price<'a>(
    lines: &[CartLine<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            ensure_currency(line, currency)?;

            Ok(acc.add(line.line_total()?)?)
        })
}

/// Compute the cart totals for the given tax rate and bill discount.
///
/// # Errors
///
/// - [`TotalPriceError::NegativeBillDiscount`]: the bill discount is below zero.
/// - any error from [`total_price`], or from tax and line discount arithmetic.
pub fn compute_totals<'a>(
    lines: &[CartLine<'a>],
    currency: &'a Currency,
    tax_rate: TaxRate,
    bill_discount: Money<'a, Currency>,
) -> Result<Totals<'a>, TotalPriceError> {
    if bill_discount.is_negative() {
        return Err(TotalPriceError::NegativeBillDiscount);
    }

    let zero = Money::from_minor(0, currency);

    let subtotal = total_price(lines, currency)?;
    let tax = tax_rate.tax_on(&subtotal)?;
    let total_before_discount = subtotal.add(tax)?;

    let remaining = total_before_discount.sub(bill_discount)?;
    let grand_total = if remaining.is_negative() {
        zero
    } else {
        remaining
    };

    let line_discounts = lines.iter().try_fold(zero, |acc, line| {
        Ok::<_, TotalPriceError>(acc.add(line.discount_amount()?)?)
    })?;

    Ok(Totals {
        subtotal,
        tax,
        total_before_discount,
        bill_discount,
        grand_total,
        line_discounts,
    })
}

fn ensure_currency(line: &CartLine<'_>, currency: &Currency) -> Result<(), TotalPriceError> {
    let line_currency = line.unit_price().currency();

    if line_currency == currency {
        Ok(())
    } else {
        Err(TotalPriceError::CurrencyMismatch(
            line.id().to_string(),
            line_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}

/// Convert money to a major-unit decimal, e.g. 85000 paise to `850.00`.
#[must_use]
pub fn to_decimal(money: &Money<'_, Currency>) -> Decimal {
    *money.amount()
}

/// Exact minor units of an amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the amount does not fit in `i64` minor
/// units or carries a fraction of a minor unit.
pub fn minor_units(money: &Money<'_, Currency>) -> Result<i64, DiscountError> {
    money
        .try_to_minor_units()
        .map_err(|_unrepresentable| DiscountError::PercentConversion)
}

/// Convert a major-unit decimal to money, rounding half away from zero to the currency's
/// minor unit.
///
/// Returns `None` if the amount does not fit in minor units.
#[must_use]
pub fn from_decimal(amount: Decimal, currency: &Currency) -> Option<Money<'_, Currency>> {
    let scale = 10_i64.checked_pow(currency.exponent)?;

    amount
        .checked_mul(Decimal::from(scale))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .map(|minor| Money::from_minor(minor, currency))
}

/// Look up a supported currency by ISO code.
#[must_use]
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code.trim().to_ascii_uppercase().as_str() {
        "INR" => Some(iso::INR),
        "GBP" => Some(iso::GBP),
        "USD" => Some(iso::USD),
        "EUR" => Some(iso::EUR),
        _ => None,
    }
}
