//! Cart
//!
//! The cart of an in-progress counter sale. Lines are identified by part number; adding
//! an item that is already in the cart bumps its quantity instead of adding a new line.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::{PartNo, StockItem},
    discounts::LineDiscount,
    items::CartLine,
    pricing::{TaxRate, TotalPriceError, Totals, compute_totals, total_price},
};

/// Errors related to cart edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line with this part number is in the cart.
    #[error("no line for part {0} in cart")]
    LineNotFound(PartNo),
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add one unit of a catalog item, returning the line's new quantity.
    pub fn add_item(&mut self, item: &StockItem<'a>) -> u32 {
        self.add_item_quantity(item, 1)
    }

    /// Add `quantity` units of a catalog item, returning the line's new quantity.
    ///
    /// Adding zero units of an item that is not in the cart leaves the cart unchanged.
    pub fn add_item_quantity(&mut self, item: &StockItem<'a>, quantity: u32) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == item.part_no) {
            line.quantity = line.quantity.saturating_add(quantity);

            return line.quantity;
        }

        if quantity > 0 {
            self.lines.push(CartLine::from_stock(item, quantity));
        }

        quantity
    }

    /// Adjust a line's quantity by `delta`, floored at zero. A line that reaches zero is
    /// removed. Returns the new quantity, or `None` if the part is not in the cart.
    pub fn update_quantity(&mut self, id: &PartNo, delta: i64) -> Option<u32> {
        let line = self.lines.iter_mut().find(|line| &line.id == id)?;

        let updated = i64::from(line.quantity).saturating_add(delta).max(0);
        line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);

        let quantity = line.quantity;

        self.lines.retain(|line| line.quantity > 0);

        Some(quantity)
    }

    /// Remove a line, returning it if it was in the cart.
    pub fn remove_item(&mut self, id: &PartNo) -> Option<CartLine<'a>> {
        let position = self.lines.iter().position(|line| &line.id == id)?;

        Some(self.lines.remove(position))
    }

    /// Overwrite a line's discount. The discount is not bounded by the line's value.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the part is not in the cart.
    pub fn set_line_discount(
        &mut self,
        id: &PartNo,
        discount: LineDiscount<'a>,
    ) -> Result<(), CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| &line.id == id)
            .ok_or_else(|| CartError::LineNotFound(id.clone()))?;

        line.discount = discount;

        Ok(())
    }

    /// Get a line by part number.
    #[must_use]
    pub fn get(&self, id: &PartNo) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Calculate the subtotal of the cart, before tax and discounts.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic or currency mismatch error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        total_price(&self.lines, self.currency)
    }

    /// Calculate the cart totals.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if the bill discount is negative or the arithmetic fails.
    pub fn totals(
        &self,
        tax_rate: TaxRate,
        bill_discount: Money<'a, Currency>,
    ) -> Result<Totals<'a>, TotalPriceError> {
        compute_totals(&self.lines, self.currency, tax_rate, bill_discount)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
