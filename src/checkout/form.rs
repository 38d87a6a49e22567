//! Checkout form

use std::fmt;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::payments::PaymentEntry;

/// A single field that failed validation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Customer name was blank.
    #[error("customer name is required")]
    CustomerNameMissing,

    /// Mobile number was blank.
    #[error("mobile number is required")]
    MobileMissing,

    /// No payment entries were added.
    #[error("at least one payment is required")]
    PaymentsMissing,

    /// The payment at this index has a negative amount.
    #[error("payment {0} has a negative amount")]
    NegativePaymentAmount(usize),

    /// The payment at this index has a blank method.
    #[error("payment {0} has no method")]
    PaymentMethodMissing(usize),

    /// The bill discount was negative.
    #[error("bill discount cannot be negative")]
    NegativeBillDiscount,
}

impl FieldError {
    /// Name of the form field the error belongs to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::CustomerNameMissing => "customerName",
            FieldError::MobileMissing => "mobile",
            FieldError::PaymentsMissing
            | FieldError::NegativePaymentAmount(_)
            | FieldError::PaymentMethodMissing(_) => "payments",
            FieldError::NegativeBillDiscount => "billDiscount",
        }
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// The individual field errors, in form order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Errors for a single field.
    pub fn for_field(&self, field: &str) -> impl Iterator<Item = &FieldError> {
        self.0.iter().filter(move |error| error.field() == field)
    }

    /// Whether a particular error was reported.
    #[must_use]
    pub fn contains(&self, error: FieldError) -> bool {
        self.0.contains(&error)
    }

    /// Number of field errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no errors were reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("checkout form is invalid")?;

        for (i, error) in self.0.iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { "; " })?;
            write!(f, "{error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Customer, payment and bill discount details collected for one sale.
#[derive(Debug, Clone)]
pub struct CheckoutForm<'a> {
    /// Customer name
    pub customer_name: String,

    /// Customer mobile number
    pub mobile: String,

    /// Vehicle registration number
    pub registration_number: Option<String>,

    /// Payments collected, usually one or two
    pub payments: SmallVec<[PaymentEntry<'a>; 2]>,

    /// Discount taken off the taxed total
    pub bill_discount: Money<'a, Currency>,

    currency: &'a Currency,
}

impl<'a> CheckoutForm<'a> {
    /// An empty form for a sale in `currency`.
    #[must_use]
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            customer_name: String::new(),
            mobile: String::new(),
            registration_number: None,
            payments: SmallVec::new(),
            bill_discount: Money::from_minor(0, currency),
            currency,
        }
    }

    /// Currency of the sale.
    #[must_use]
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Add a payment entry.
    pub fn add_payment(&mut self, payment: PaymentEntry<'a>) {
        self.payments.push(payment);
    }

    /// Check every field, collecting all errors rather than stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each invalid field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.customer_name.trim().is_empty() {
            errors.push(FieldError::CustomerNameMissing);
        }

        if self.mobile.trim().is_empty() {
            errors.push(FieldError::MobileMissing);
        }

        if self.payments.is_empty() {
            errors.push(FieldError::PaymentsMissing);
        }

        for (i, payment) in self.payments.iter().enumerate() {
            if payment.amount.is_negative() {
                errors.push(FieldError::NegativePaymentAmount(i));
            }

            if payment.method.label().trim().is_empty() {
                errors.push(FieldError::PaymentMethodMissing(i));
            }
        }

        if self.bill_discount.is_negative() {
            errors.push(FieldError::NegativeBillDiscount);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Whether the form passes validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Clear every field back to an empty form.
    pub fn reset(&mut self) {
        *self = Self::new(self.currency);
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::payments::PaymentMethod;

    use super::*;

    fn filled<'a>() -> Result<CheckoutForm<'a>, crate::payments::PaymentError> {
        let mut form = CheckoutForm::new(INR);

        form.customer_name = "Ravi Kumar".to_string();
        form.mobile = "9876543210".to_string();
        form.add_payment(PaymentEntry::new(
            Money::from_minor(100_300, INR),
            PaymentMethod::Cash,
            None,
        )?);

        Ok(form)
    }

    #[test]
    fn empty_form_reports_every_missing_field() {
        let form = CheckoutForm::new(INR);

        let Err(errors) = form.validate() else {
            panic!("empty form should not validate");
        };

        assert_eq!(
            errors.errors(),
            &[
                FieldError::CustomerNameMissing,
                FieldError::MobileMissing,
                FieldError::PaymentsMissing,
            ]
        );
    }

    #[test]
    fn filled_form_is_valid() -> TestResult {
        assert!(filled()?.is_valid());

        Ok(())
    }

    #[test]
    fn registration_number_is_optional() -> TestResult {
        let mut form = filled()?;
        form.registration_number = None;

        assert!(form.is_valid());

        Ok(())
    }

    #[test]
    fn whitespace_name_is_missing() -> TestResult {
        let mut form = filled()?;
        form.customer_name = "   ".to_string();

        assert_eq!(
            form.validate(),
            Err(ValidationErrors(vec![FieldError::CustomerNameMissing]))
        );

        Ok(())
    }

    #[test]
    fn negative_amounts_are_reported_per_field() -> TestResult {
        let mut form = filled()?;

        form.payments.push(PaymentEntry {
            amount: Money::from_minor(-1, INR),
            method: PaymentMethod::Other(String::new()),
            reference: None,
        });
        form.bill_discount = Money::from_minor(-500, INR);

        let Err(errors) = form.validate() else {
            panic!("negative amounts should not validate");
        };

        assert!(errors.contains(FieldError::NegativePaymentAmount(1)));
        assert!(errors.contains(FieldError::PaymentMethodMissing(1)));
        assert!(errors.contains(FieldError::NegativeBillDiscount));
        assert_eq!(errors.for_field("payments").count(), 2);
        assert_eq!(errors.for_field("billDiscount").count(), 1);

        Ok(())
    }

    #[test]
    fn oversized_negative_amounts_are_still_negative() -> TestResult {
        let mut form = filled()?;
        let huge = Money::from_minor(i64::MIN, INR).add(Money::from_minor(i64::MIN, INR))?;

        form.payments.push(PaymentEntry {
            amount: huge,
            method: PaymentMethod::Card,
            reference: None,
        });
        form.bill_discount = huge;

        let Err(errors) = form.validate() else {
            panic!("amounts below i64 minor units should not validate");
        };

        assert!(errors.contains(FieldError::NegativePaymentAmount(1)));
        assert!(errors.contains(FieldError::NegativeBillDiscount));

        Ok(())
    }

    #[test]
    fn errors_display_as_one_line() {
        let errors = ValidationErrors(vec![FieldError::MobileMissing, FieldError::PaymentsMissing]);

        assert_eq!(
            errors.to_string(),
            "checkout form is invalid: mobile number is required; at least one payment is required"
        );
    }

    #[test]
    fn reset_clears_fields_and_keeps_currency() -> TestResult {
        let mut form = filled()?;
        form.registration_number = Some("KA01AB1234".to_string());
        form.bill_discount = Money::from_minor(5_000, INR);

        form.reset();

        assert!(form.customer_name.is_empty());
        assert!(form.payments.is_empty());
        assert_eq!(form.registration_number, None);
        assert_eq!(form.bill_discount, Money::from_minor(0, INR));
        assert_eq!(form.currency(), INR);

        Ok(())
    }
}
