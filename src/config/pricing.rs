//! Pricing Config

use clap::Args;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;

use crate::{
    config::ConfigError,
    discounts::parse_percentage,
    pricing::{TaxRate, currency_from_code},
};

/// Currency and tax settings.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// ISO currency code of the counter (INR, GBP, USD, EUR)
    #[arg(long, env = "TORQUE_CURRENCY", default_value = "INR")]
    pub currency: String,

    /// Tax rate applied to the subtotal, e.g. "18%" or "0.18"
    #[arg(long, env = "TORQUE_TAX_RATE", default_value = "18%")]
    pub tax_rate: String,
}

impl PricingConfig {
    /// The configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for an unsupported code.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        currency_from_code(&self.currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// The configured tax rate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the rate does not parse or is negative.
    pub fn tax_rate(&self) -> Result<TaxRate, ConfigError> {
        let rate = parse_percentage(&self.tax_rate)?;

        if rate * Decimal::ONE < Decimal::ZERO {
            return Err(ConfigError::NegativeTaxRate(self.tax_rate.clone()));
        }

        Ok(TaxRate::new(rate))
    }
}
