//! Checkout
//!
//! Pairs a [`Cart`] with its [`CheckoutForm`] for one counter sale, gates submission on
//! both, and hands the resulting payload to a [`CounterSalesService`].
//!
//! A submission is a single attempt. On success the cart is cleared and the form reset;
//! on failure both are left exactly as they were so the operator can correct and resubmit.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    cart::Cart,
    client::{ApiError, sales::CounterSalesService, wire::SaleId},
    payments::total_paid,
    pricing::{TaxRate, TotalPriceError, Totals},
};

pub mod form;
mod payload;

pub use form::{CheckoutForm, FieldError, ValidationErrors};
pub use payload::{build_payload, line_payload};

/// Errors from a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to sell.
    #[error("cart is empty")]
    EmptyCart,

    /// The form has invalid fields.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Totals could not be calculated.
    #[error(transparent)]
    Totals(#[from] TotalPriceError),

    /// The backend rejected or failed the request. Displays the backend's message as is.
    #[error(transparent)]
    Request(#[from] ApiError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOutcome<'a> {
    /// Identifier of the created sale, when the backend returns one
    pub sale_id: Option<SaleId>,

    /// Totals as displayed when the sale was submitted
    pub totals: Totals<'a>,
}

/// An in-progress counter sale.
#[derive(Debug, Clone)]
pub struct Checkout<'a> {
    cart: Cart<'a>,
    form: CheckoutForm<'a>,
    tax_rate: TaxRate,
}

impl<'a> Checkout<'a> {
    /// Start an empty sale in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency, tax_rate: TaxRate) -> Self {
        Self {
            cart: Cart::new(currency),
            form: CheckoutForm::new(currency),
            tax_rate,
        }
    }

    /// Start a sale from an existing cart and form.
    #[must_use]
    pub fn with_parts(cart: Cart<'a>, form: CheckoutForm<'a>, tax_rate: TaxRate) -> Self {
        Self {
            cart,
            form,
            tax_rate,
        }
    }

    /// The cart.
    #[must_use]
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// The cart, for editing.
    pub fn cart_mut(&mut self) -> &mut Cart<'a> {
        &mut self.cart
    }

    /// The form.
    #[must_use]
    pub fn form(&self) -> &CheckoutForm<'a> {
        &self.form
    }

    /// The form, for editing.
    pub fn form_mut(&mut self) -> &mut CheckoutForm<'a> {
        &mut self.form
    }

    /// The tax rate applied to the subtotal.
    #[must_use]
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Current totals, using the form's bill discount.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the bill discount is negative or the arithmetic fails.
    pub fn totals(&self) -> Result<Totals<'a>, TotalPriceError> {
        self.cart.totals(self.tax_rate, self.form.bill_discount)
    }

    /// Whether the sale may be submitted: the cart has lines and the form is valid.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.cart.is_empty() && self.form.is_valid()
    }

    /// Grand total less the payments entered so far. Negative when overpaid.
    ///
    /// Informational only; submission does not require payments to match the total.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the totals or payment sum cannot be calculated.
    pub fn payment_shortfall(&self) -> Result<Money<'a, Currency>, CheckoutError> {
        let totals = self.totals()?;
        let paid = total_paid(&self.form.payments, self.cart.currency())?;

        Ok(totals.grand_total.sub(paid)?)
    }

    /// Abandon the sale, clearing the cart and resetting the form.
    pub fn cancel(&mut self) {
        self.cart.clear();
        self.form.reset();
    }

    /// Submit the sale.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::Validation`]: the form has invalid fields.
    /// - [`CheckoutError::Totals`]: totals could not be calculated.
    /// - [`CheckoutError::Request`]: the backend call failed. Cart and form are unchanged.
    #[instrument(skip_all, fields(lines = self.cart.len()))]
    pub async fn submit(
        &mut self,
        sales: &dyn CounterSalesService,
    ) -> Result<CheckoutOutcome<'a>, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.form.validate()?;

        let totals = self.totals()?;
        let payload = build_payload(&self.form, &self.cart);

        let created = match sales.create_sale(payload).await {
            Ok(created) => created,
            Err(error) => {
                warn!(%error, "checkout failed");

                return Err(error.into());
            }
        };

        match &created.id {
            Some(id) => info!(sale = %id, grand_total = %totals.grand_total, "checkout complete"),
            None => info!(grand_total = %totals.grand_total, "checkout complete"),
        }

        self.cancel();

        Ok(CheckoutOutcome {
            sale_id: created.id,
            totals,
        })
    }
}
