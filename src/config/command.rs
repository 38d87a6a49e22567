//! Operator commands

use std::path::PathBuf;

use clap::Subcommand;
use rust_decimal::Decimal;

use crate::{client::wire::SaleId, payments::PaymentMethod};

/// What to do.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List sellable stock
    Stock {
        /// Only show parts whose name or part number contains this text
        query: Option<String>,

        /// Hide parts with nothing on hand
        #[arg(long)]
        in_stock: bool,
    },

    /// Price a cart file offline and print the receipt
    Quote {
        /// YAML cart file
        file: PathBuf,
    },

    /// Price a cart file and submit it as a counter sale
    Checkout {
        /// YAML cart file
        file: PathBuf,
    },

    /// Act on an existing sale
    Sale {
        /// Sale action
        #[command(subcommand)]
        action: SaleCommand,
    },
}

/// Actions on an existing sale.
#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    /// Mark a pending sale complete
    Complete {
        /// Sale id
        id: SaleId,
    },

    /// Cancel a pending sale
    Cancel {
        /// Sale id
        id: SaleId,
    },

    /// Refund a completed sale
    Refund {
        /// Sale id
        id: SaleId,
    },

    /// Record a payment against a sale
    Pay {
        /// Sale id
        id: SaleId,

        /// Amount in major units, e.g. 500.00
        #[arg(long)]
        amount: Decimal,

        /// Payment method (cash, upi, card or any label)
        #[arg(long)]
        method: PaymentMethod,

        /// Transaction reference
        #[arg(long)]
        reference: Option<String>,
    },
}
