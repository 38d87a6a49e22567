//! Checkout payload

use crate::{
    cart::Cart,
    checkout::form::CheckoutForm,
    client::wire::{CheckoutPayload, SaleLinePayload},
    items::CartLine,
    payments::PaymentEntry,
    pricing::to_decimal,
};

/// Map a cart line to its wire shape.
#[must_use]
pub fn line_payload(line: &CartLine<'_>) -> SaleLinePayload {
    SaleLinePayload {
        part_no: line.id().clone(),
        quantity: line.quantity(),
        unit_price: to_decimal(line.unit_price()),
        discount: line.discount().value(),
        discount_type: line.discount().kind(),
    }
}

/// Build the body for `POST /counter-sales` from a form and cart.
///
/// Text fields are trimmed and a blank registration number is omitted. The form is not
/// validated here.
#[must_use]
pub fn build_payload(form: &CheckoutForm<'_>, cart: &Cart<'_>) -> CheckoutPayload {
    CheckoutPayload {
        customer_name: form.customer_name.trim().to_string(),
        mobile: form.mobile.trim().to_string(),
        registration_number: form
            .registration_number
            .as_deref()
            .map(str::trim)
            .filter(|registration| !registration.is_empty())
            .map(str::to_string),
        items: cart.iter().map(line_payload).collect(),
        payments: form.payments.iter().map(PaymentEntry::to_payload).collect(),
        bill_discount: to_decimal(&form.bill_discount),
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use crate::{
        catalog::{PartNo, StockItem},
        discounts::{DiscountType, LineDiscount},
        payments::PaymentMethod,
    };

    use super::*;

    #[test]
    fn payload_maps_lines_payments_and_discounts() -> TestResult {
        let mut cart = Cart::new(INR);
        let filter = StockItem {
            part_no: PartNo::from("OF-850"),
            name: "Oil Filter".to_string(),
            selling_price: Money::from_minor(85_000, INR),
            quantity_on_hand: 10,
        };
        let pads = StockItem {
            part_no: PartNo::from("BP-1200"),
            name: "Brake Pads".to_string(),
            selling_price: Money::from_minor(120_000, INR),
            quantity_on_hand: 4,
        };

        cart.add_item_quantity(&filter, 2);
        cart.add_item(&pads);
        cart.set_line_discount(
            &pads.part_no,
            LineDiscount::Percent(Percentage::from(Decimal::new(10, 2))),
        )?;

        let mut form = CheckoutForm::new(INR);
        form.customer_name = "  Ravi Kumar ".to_string();
        form.mobile = "9876543210".to_string();
        form.registration_number = Some("  ".to_string());
        form.bill_discount = Money::from_minor(5_050, INR);
        form.add_payment(PaymentEntry::new(
            Money::from_minor(100_000, INR),
            PaymentMethod::Upi,
            Some("UTR9".to_string()),
        )?);

        let payload = build_payload(&form, &cart);

        assert_eq!(payload.customer_name, "Ravi Kumar");
        assert_eq!(payload.registration_number, None);
        assert_eq!(payload.bill_discount, Decimal::new(5_050, 2));
        assert_eq!(payload.items.len(), 2);

        let first = payload.items.first().ok_or("missing first line")?;
        assert_eq!(first.part_no, PartNo::from("OF-850"));
        assert_eq!(first.quantity, 2);
        assert_eq!(first.unit_price, Decimal::new(85_000, 2));
        assert_eq!(first.discount_type, DiscountType::Flat);
        assert!(first.discount.is_zero());

        let second = payload.items.get(1).ok_or("missing second line")?;
        assert_eq!(second.discount_type, DiscountType::Percent);
        assert_eq!(second.discount, Decimal::new(10, 0));

        let payment = payload.payments.first().ok_or("missing payment")?;
        assert_eq!(payment.method, "UPI");
        assert_eq!(payment.amount, Decimal::new(1_000, 0));

        Ok(())
    }
}
