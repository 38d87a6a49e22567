//! Stock table rendering.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use crate::catalog::StockItem;

/// Write a table of stock items.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_stock_table(mut out: impl io::Write, items: &[&StockItem<'_>]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No matching stock.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Part No", "Name", "Price", "On Hand"]);

    for item in items {
        builder.push_record([
            item.part_no.to_string(),
            item.name.clone(),
            format!("{}", item.selling_price),
            item.quantity_on_hand.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..4), Alignment::right());

    writeln!(out, "{table}")
}
