//! Payments

use std::{fmt, str::FromStr};

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{client::wire::PaymentPayload, pricing::to_decimal};

/// Errors constructing a payment entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Payment amounts must be zero or more.
    #[error("payment amount cannot be negative")]
    NegativeAmount,

    /// The payment method label was blank.
    #[error("payment method is required")]
    EmptyMethod,
}

/// How a payment was made.
///
/// The backend accepts free text; the three named methods are the ones offered at the
/// counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Cash
    Cash,

    /// UPI transfer
    Upi,

    /// Card
    Card,

    /// Any other label
    Other(String),
}

impl PaymentMethod {
    /// Label sent to the backend.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
            PaymentMethod::Other(label) => label,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(PaymentError::EmptyMethod);
        }

        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "cash" => PaymentMethod::Cash,
            "upi" => PaymentMethod::Upi,
            "card" => PaymentMethod::Card,
            _ => PaymentMethod::Other(trimmed.to_string()),
        })
    }
}

/// A single payment collected against a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEntry<'a> {
    /// Amount paid
    pub amount: Money<'a, Currency>,

    /// Payment method
    pub method: PaymentMethod,

    /// Transaction reference, e.g. a UPI reference number
    pub reference: Option<String>,
}

impl<'a> PaymentEntry<'a> {
    /// Create a payment entry.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::NegativeAmount`] if `amount` is below zero.
    pub fn new(
        amount: Money<'a, Currency>,
        method: PaymentMethod,
        reference: Option<String>,
    ) -> Result<Self, PaymentError> {
        if amount.is_negative() {
            return Err(PaymentError::NegativeAmount);
        }

        Ok(Self {
            amount,
            method,
            reference: reference.filter(|reference| !reference.trim().is_empty()),
        })
    }

    /// Wire representation of this payment.
    #[must_use]
    pub fn to_payload(&self) -> PaymentPayload {
        PaymentPayload {
            amount: to_decimal(&self.amount),
            method: self.method.label().to_string(),
            reference: self.reference.clone(),
        }
    }
}

/// Sum of a list of payments.
///
/// # Errors
///
/// Returns a [`MoneyError`] if a payment is in a different currency.
pub fn total_paid<'a>(
    payments: &[PaymentEntry<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError> {
    payments
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, payment| {
            acc.add(payment.amount)
        })
}
