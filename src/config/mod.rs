//! Configuration
//!
//! Command line arguments with environment variable fallbacks. A `.env` file in the working
//! directory is loaded first when present.

use clap::Parser;
use thiserror::Error;

use crate::{
    config::{api::ApiConfig, command::Command, logging::LoggingConfig, pricing::PricingConfig},
    discounts::DiscountError,
};

pub mod api;
pub mod command;
pub mod logging;
pub mod pricing;

/// Errors resolving configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The currency code is not supported.
    #[error("unsupported currency: {0}")]
    UnknownCurrency(String),

    /// The tax rate is below zero.
    #[error("tax rate cannot be negative: {0}")]
    NegativeTaxRate(String),

    /// The tax rate did not parse.
    #[error(transparent)]
    TaxRate(#[from] DiscountError),
}

/// Torque counter-sales CLI configuration
#[derive(Debug, Parser)]
#[command(name = "torque", about = "Workshop counter-sales terminal", long_about = None)]
pub struct Config {
    /// Sales backend settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Currency and tax settings.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // A missing .env is fine
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
