//! Fixtures
//!
//! YAML cart files for quoting and submitting sales from the command line.
//!
//! ```yaml
//! customer:
//!   name: Ravi Kumar
//!   mobile: "9876543210"
//!   registration_number: KA01AB1234
//! items:
//!   - part_no: OF-850
//!     name: Oil Filter
//!     price: 850 INR
//!     quantity: 1
//!     discount: 10%
//! bill_discount: 50 INR
//! payments:
//!   - amount: 953 INR
//!     method: upi
//!     reference: UTR123
//! ```

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::CartError,
    catalog::{PartNo, StockItem},
    checkout::Checkout,
    discounts::{LineDiscount, parse_percentage},
    payments::{PaymentEntry, PaymentError, PaymentMethod},
    pricing::{TaxRate, currency_from_code, from_decimal},
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Amount in a different currency to the sale
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Invalid payment entry
    #[error("Invalid payment: {0}")]
    Payment(#[from] PaymentError),

    /// Cart edit failed
    #[error("Failed to build cart: {0}")]
    Cart(#[from] CartError),
}

/// A cart file.
#[derive(Debug, Deserialize)]
pub struct CheckoutFixture {
    /// Customer details
    #[serde(default)]
    pub customer: CustomerFixture,

    /// Cart lines, in order
    pub items: Vec<ItemFixture>,

    /// Bill-level discount (e.g., "50 INR")
    #[serde(default)]
    pub bill_discount: Option<String>,

    /// Payments collected
    #[serde(default)]
    pub payments: Vec<PaymentFixture>,
}

/// Customer Fixture
#[derive(Debug, Default, Deserialize)]
pub struct CustomerFixture {
    /// Customer name
    #[serde(default)]
    pub name: String,

    /// Mobile number
    #[serde(default)]
    pub mobile: String,

    /// Vehicle registration number
    #[serde(default)]
    pub registration_number: Option<String>,
}

/// Item Fixture
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Part number
    pub part_no: String,

    /// Part name
    pub name: String,

    /// Unit price (e.g., "850 INR")
    pub price: String,

    /// Units sold
    #[serde(default = "one")]
    pub quantity: u32,

    /// Line discount, either an amount ("50 INR") or a percentage ("10%")
    #[serde(default)]
    pub discount: Option<String>,
}

/// Payment Fixture
#[derive(Debug, Deserialize)]
pub struct PaymentFixture {
    /// Amount (e.g., "1003 INR")
    pub amount: String,

    /// Payment method label
    pub method: String,

    /// Transaction reference
    #[serde(default)]
    pub reference: Option<String>,
}

fn one() -> u32 {
    1
}

impl CheckoutFixture {
    /// Load a cart file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a cart from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a cart.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Build a checkout priced in `currency`.
    ///
    /// Lines with a quantity of zero are skipped. Lines repeating a part number are merged.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount does not parse or is in another currency.
    pub fn into_checkout(
        self,
        currency: &'static Currency,
        tax_rate: TaxRate,
    ) -> Result<Checkout<'static>, FixtureError> {
        let mut checkout = Checkout::new(currency, tax_rate);

        for item in self.items.into_iter().filter(|item| item.quantity > 0) {
            let stock = StockItem {
                part_no: PartNo::from(item.part_no),
                name: item.name,
                selling_price: parse_money(&item.price, currency)?,
                quantity_on_hand: 0,
            };

            checkout.cart_mut().add_item_quantity(&stock, item.quantity);

            if let Some(discount) = item.discount {
                checkout
                    .cart_mut()
                    .set_line_discount(&stock.part_no, parse_discount(&discount, currency)?)?;
            }
        }

        let form = checkout.form_mut();

        form.customer_name = self.customer.name;
        form.mobile = self.customer.mobile;
        form.registration_number = self.customer.registration_number;

        if let Some(bill_discount) = self.bill_discount {
            form.bill_discount = parse_money(&bill_discount, currency)?;
        }

        for payment in self.payments {
            form.add_payment(PaymentEntry::new(
                parse_money(&payment.amount, currency)?,
                payment.method.parse::<PaymentMethod>()?,
                payment.reference,
            )?);
        }

        Ok(checkout)
    }
}

/// Parse price string (e.g., "850.50 INR") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount
/// is not a decimal number, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency =
        currency_from_code(code).ok_or_else(|| FixtureError::UnknownCurrency((*code).to_string()))?;

    from_decimal(amount, currency).ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))
}

fn parse_money(
    s: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, FixtureError> {
    let money = parse_price(s)?;

    if money.currency() != currency {
        return Err(FixtureError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            money.currency().iso_alpha_code.to_string(),
        ));
    }

    Ok(money)
}

fn parse_discount(
    s: &str,
    currency: &'static Currency,
) -> Result<LineDiscount<'static>, FixtureError> {
    if s.trim().ends_with('%') {
        let percent =
            parse_percentage(s).map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        return Ok(LineDiscount::Percent(percent));
    }

    Ok(LineDiscount::Flat(parse_money(s, currency)?))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use crate::discounts::DiscountType;

    use super::*;

    const CART: &str = r#"
customer:
  name: Ravi Kumar
  mobile: "9876543210"
  registration_number: KA01AB1234
items:
  - part_no: OF-850
    name: Oil Filter
    price: 850 INR
  - part_no: BP-1200
    name: Brake Pads
    price: 1200 INR
    quantity: 2
    discount: 10%
  - part_no: WB-1
    name: Wiper Blade
    price: 450 INR
    quantity: 0
bill_discount: 50 INR
payments:
  - amount: 3000 INR
    method: upi
    reference: UTR123
"#;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("850INR");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_reads_major_units() -> TestResult {
        assert_eq!(parse_price("850.50 INR")?, Money::from_minor(85_050, INR));
        assert_eq!(parse_price("2.99 GBP")?, Money::from_minor(299, GBP));

        Ok(())
    }

    #[test]
    fn fixture_builds_checkout() -> TestResult {
        let checkout = CheckoutFixture::from_yaml(CART)?.into_checkout(INR, TaxRate::standard())?;

        let cart = checkout.cart();

        assert_eq!(cart.len(), 2, "zero quantity lines are skipped");
        assert_eq!(
            cart.get(&PartNo::from("BP-1200")).map(|line| line.discount().kind()),
            Some(DiscountType::Percent)
        );

        let form = checkout.form();

        assert_eq!(form.customer_name, "Ravi Kumar");
        assert_eq!(form.bill_discount, Money::from_minor(5_000, INR));
        assert_eq!(form.payments.len(), 1);
        assert!(checkout.can_submit());

        // 850 + 2 × 1200 = 3250, +18% = 3835, −50 = 3785
        assert_eq!(checkout.totals()?.grand_total, Money::from_minor(378_500, INR));

        Ok(())
    }

    #[test]
    fn fixture_rejects_foreign_currency() -> TestResult {
        let fixture = CheckoutFixture::from_yaml(
            "items:\n  - part_no: A\n    name: A\n    price: 1 GBP\n",
        )?;

        let result = fixture.into_checkout(INR, TaxRate::standard());

        assert!(matches!(
            result,
            Err(FixtureError::CurrencyMismatch(ref expected, ref found))
                if expected == "INR" && found == "GBP"
        ));

        Ok(())
    }

    #[test]
    fn load_reads_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(CART.as_bytes())?;

        let fixture = CheckoutFixture::load(file.path())?;

        assert_eq!(fixture.items.len(), 3);
        assert_eq!(fixture.customer.mobile, "9876543210");

        Ok(())
    }

    #[test]
    fn load_reports_missing_file() -> TestResult {
        let dir = tempfile::tempdir()?;

        let result = CheckoutFixture::load(dir.path().join("missing.yml"));

        assert!(matches!(result, Err(FixtureError::Io(_))));

        Ok(())
    }
}
