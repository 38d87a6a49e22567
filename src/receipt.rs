//! Receipt
//!
//! A priced snapshot of a cart for display at the counter.

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::PartNo,
    client::wire::SaleId,
    discounts::LineDiscount,
    pricing::{TaxRate, TotalPriceError, Totals},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating a line total.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Writing the receipt failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A priced cart line.
#[derive(Debug, Clone)]
pub struct ReceiptLine<'a> {
    /// Part number
    pub part_no: PartNo,

    /// Part name
    pub name: String,

    /// Units sold
    pub quantity: u32,

    /// Price per unit
    pub unit_price: Money<'a, Currency>,

    /// `unit price × quantity`
    pub line_total: Money<'a, Currency>,

    /// Line discount as entered
    pub discount: LineDiscount<'a>,
}

/// Receipt for a priced cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 8]>,
    totals: Totals<'a>,
    tax_rate: TaxRate,
    sale_id: Option<SaleId>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a cart and the totals calculated for it.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line total cannot be calculated.
    pub fn new(
        cart: &Cart<'a>,
        totals: Totals<'a>,
        tax_rate: TaxRate,
    ) -> Result<Self, ReceiptError> {
        let lines = cart
            .iter()
            .map(|line| {
                Ok(ReceiptLine {
                    part_no: line.id().clone(),
                    name: line.name().to_string(),
                    quantity: line.quantity(),
                    unit_price: *line.unit_price(),
                    line_total: line.line_total()?,
                    discount: *line.discount(),
                })
            })
            .collect::<Result<_, TotalPriceError>>()?;

        Ok(Self {
            lines,
            totals,
            tax_rate,
            sale_id: None,
        })
    }

    /// Attach the identifier of the sale this receipt was issued for.
    #[must_use]
    pub fn with_sale_id(mut self, sale_id: Option<SaleId>) -> Self {
        self.sale_id = sale_id;
        self
    }

    /// Priced lines, in cart order.
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Totals shown in the summary.
    #[must_use]
    pub fn totals(&self) -> &Totals<'a> {
        &self.totals
    }

    /// Sale identifier, once the sale has been created.
    #[must_use]
    pub fn sale_id(&self) -> Option<&SaleId> {
        self.sale_id.as_ref()
    }

    /// Writes the receipt as a table followed by a summary block.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if let Some(sale_id) = &self.sale_id {
            writeln!(out, "Sale {sale_id}")?;
        }

        let mut builder = Builder::default();

        builder.push_record(["", "Part No", "Item", "Qty", "Unit Price", "Line Total", "Discount"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.part_no.to_string(),
                line.name.clone(),
                line.quantity.to_string(),
                format!("{}", line.unit_price),
                format!("{}", line.line_total),
                discount_cell(&line.discount),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..7), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let totals = &self.totals;
        let tax_label = format!("Tax ({}%):", self.tax_rate.points().normalize());

        let mut rows: SmallVec<[(String, String); 6]> = SmallVec::new();

        rows.push(("Subtotal:".to_string(), totals.subtotal.to_string()));
        rows.push((tax_label, totals.tax.to_string()));
        rows.push(("Total:".to_string(), totals.total_before_discount.to_string()));
        rows.push(("Bill Discount:".to_string(), format!("-{}", totals.bill_discount)));
        rows.push(("Grand Total:".to_string(), totals.grand_total.to_string()));

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.chars().count()).max().unwrap_or(0);

        let last = rows.len().saturating_sub(1);

        for (idx, (label, value)) in rows.iter().enumerate() {
            let line = format!(" {label:>label_width$}  {value:>value_width$}");

            if idx == last {
                writeln!(out, "\x1b[1m{line}\x1b[0m")?;
            } else {
                writeln!(out, "{line}")?;
            }
        }

        if !totals.line_discounts.is_zero() {
            writeln!(
                out,
                "\n Line discounts of {} are applied by the backend at billing.",
                totals.line_discounts
            )?;
        }

        writeln!(out)?;

        Ok(())
    }
}

fn discount_cell(discount: &LineDiscount<'_>) -> String {
    match discount {
        _ if discount.is_zero() => String::new(),
        LineDiscount::Flat(amount) => format!("{amount}"),
        LineDiscount::Percent(_) => format!("{}%", discount.value().normalize()),
    }
}
