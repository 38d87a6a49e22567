//! Items

use rusty_money::{Money, iso::Currency};

use crate::{
    catalog::{PartNo, StockItem},
    discounts::LineDiscount,
    pricing::TotalPriceError,
};

/// A line in the counter-sale cart.
///
/// Lines held by a [`Cart`](crate::cart::Cart) always have a quantity of at least one; the
/// cart drops lines that reach zero.
#[derive(Debug, Clone)]
pub struct CartLine<'a> {
    pub(crate) id: PartNo,
    pub(crate) name: String,
    pub(crate) unit_price: Money<'a, Currency>,
    pub(crate) quantity: u32,
    pub(crate) discount: LineDiscount<'a>,
}

impl<'a> CartLine<'a> {
    /// Creates a new line with no discount.
    pub fn new(id: PartNo, name: String, unit_price: Money<'a, Currency>, quantity: u32) -> Self {
        Self {
            id,
            name,
            discount: LineDiscount::none(unit_price.currency()),
            unit_price,
            quantity,
        }
    }

    /// Creates a line for a catalog item.
    pub fn from_stock(item: &StockItem<'a>, quantity: u32) -> Self {
        Self::new(
            item.part_no.clone(),
            item.name.clone(),
            item.selling_price,
            quantity,
        )
    }

    /// Part number identifying this line.
    pub fn id(&self) -> &PartNo {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit selling price.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Quantity in the cart.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line discount as entered.
    pub fn discount(&self) -> &LineDiscount<'a> {
        &self.discount
    }

    /// `unit price × quantity`, before any discount.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the product does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        self.unit_price
            .try_to_minor_units()
            .ok()
            .and_then(|minor| minor.checked_mul(i64::from(self.quantity)))
            .map(|minor| Money::from_minor(minor, self.unit_price.currency()))
            .ok_or_else(|| TotalPriceError::Overflow(self.id.to_string()))
    }

    /// Amount the line discount takes off `line_total`. Not bounded by the line total.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the line total overflows or the discount cannot be
    /// applied.
    pub fn discount_amount(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        let line_total = self.line_total()?;

        Ok(self.discount.amount_on(&line_total)?)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::discounts::parse_percentage;

    use super::*;

    #[test]
    fn line_total_multiplies_quantity() -> TestResult {
        let line = CartLine::new(
            PartNo::from("OF-1"),
            "Oil Filter".to_string(),
            Money::from_minor(85_000, INR),
            3,
        );

        assert_eq!(line.line_total()?, Money::from_minor(255_000, INR));

        Ok(())
    }

    #[test]
    fn line_total_overflow_errors() {
        let line = CartLine::new(
            PartNo::from("BIG"),
            "Big".to_string(),
            Money::from_minor(i64::MAX, INR),
            2,
        );

        assert!(matches!(line.line_total(), Err(TotalPriceError::Overflow(id)) if id == "BIG"));
    }

    #[test]
    fn discount_amount_uses_line_total() -> TestResult {
        let mut line = CartLine::new(
            PartNo::from("BP-2"),
            "Brake Pads".to_string(),
            Money::from_minor(120_000, INR),
            2,
        );

        line.discount = LineDiscount::Percent(parse_percentage("5%")?);

        assert_eq!(line.discount_amount()?, Money::from_minor(12_000, INR));

        Ok(())
    }

    #[test]
    fn new_line_has_no_discount() {
        let line = CartLine::new(
            PartNo::from("SP-3"),
            "Spark Plug".to_string(),
            Money::from_minor(35_000, INR),
            1,
        );

        assert!(line.discount().is_zero());
    }
}
