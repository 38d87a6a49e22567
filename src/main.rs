//! Torque counter-sales CLI

use std::{
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tracing::{error, info};

use torque::{
    catalog::{Catalog, table::write_stock_table},
    checkout::Checkout,
    client::{
        ApiClient,
        sales::{CounterSalesService, HttpCounterSalesService},
        stock::{HttpStockService, StockService},
        wire::Sale,
    },
    config::{
        Config,
        api::ApiConfig,
        command::{Command, SaleCommand},
    },
    fixtures::CheckoutFixture,
    observability::init_subscriber,
    payments::PaymentEntry,
    pricing::{TaxRate, from_decimal},
    receipt::Receipt,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    if let Err(error) = init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");

            #[expect(clippy::print_stderr, reason = "command errors are reported to the operator")]
            {
                eprintln!("error: {message}");
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), String> {
    let Config {
        api,
        pricing,
        command,
        ..
    } = config;

    let currency = pricing.currency().map_err(|error| error.to_string())?;
    let tax_rate = pricing.tax_rate().map_err(|error| error.to_string())?;

    match command {
        Command::Quote { file } => quote(&file, currency, tax_rate),
        Command::Stock { query, in_stock } => {
            let client = api_client(&api)?;

            list_stock(&HttpStockService::new(client, currency), query.as_deref(), in_stock).await
        }
        Command::Checkout { file } => {
            let client = api_client(&api)?;

            checkout(&HttpCounterSalesService::new(client), &file, currency, tax_rate).await
        }
        Command::Sale { action } => {
            let client = api_client(&api)?;

            sale(&HttpCounterSalesService::new(client), action, currency).await
        }
    }
}

fn api_client(api: &ApiConfig) -> Result<ApiClient, String> {
    ApiClient::new(api.client_config(), api.session().shared())
        .map_err(|error| format!("failed to build http client: {error}"))
}

fn load_checkout(
    file: &Path,
    currency: &'static Currency,
    tax_rate: TaxRate,
) -> Result<Checkout<'static>, String> {
    CheckoutFixture::load(file)
        .and_then(|fixture| fixture.into_checkout(currency, tax_rate))
        .map_err(|error| format!("{}: {error}", file.display()))
}

fn quote(file: &Path, currency: &'static Currency, tax_rate: TaxRate) -> Result<(), String> {
    let checkout = load_checkout(file, currency, tax_rate)?;
    let totals = checkout.totals().map_err(|error| error.to_string())?;
    let receipt =
        Receipt::new(checkout.cart(), totals, tax_rate).map_err(|error| error.to_string())?;

    let mut out = io::stdout().lock();

    receipt.write_to(&mut out).map_err(|error| error.to_string())?;

    if let Err(errors) = checkout.form().validate() {
        writeln!(out, "Not ready to submit: {errors}").map_err(|error| error.to_string())?;
    }

    let shortfall = checkout
        .payment_shortfall()
        .map_err(|error| error.to_string())?;

    if !shortfall.is_zero() {
        writeln!(out, "Balance due: {shortfall}").map_err(|error| error.to_string())?;
    }

    Ok(())
}

async fn list_stock(
    stock: &dyn StockService,
    query: Option<&str>,
    in_stock_only: bool,
) -> Result<(), String> {
    let mut catalog = Catalog::new();
    let ticket = catalog.begin_refresh();

    let items = stock
        .list_stock()
        .await
        .map_err(|error| format!("failed to list stock: {error}"))?;

    catalog
        .apply_refresh(ticket, items)
        .map_err(|error| error.to_string())?;

    let found = catalog.search(query.unwrap_or_default(), in_stock_only);

    write_stock_table(io::stdout().lock(), &found).map_err(|error| error.to_string())
}

async fn checkout(
    sales: &dyn CounterSalesService,
    file: &Path,
    currency: &'static Currency,
    tax_rate: TaxRate,
) -> Result<(), String> {
    let mut checkout = load_checkout(file, currency, tax_rate)?;
    let totals = checkout.totals().map_err(|error| error.to_string())?;
    let receipt =
        Receipt::new(checkout.cart(), totals, tax_rate).map_err(|error| error.to_string())?;

    let outcome = checkout
        .submit(sales)
        .await
        .map_err(|error| error.to_string())?;

    info!(sale = ?outcome.sale_id, "sale submitted");

    receipt
        .with_sale_id(outcome.sale_id)
        .write_to(io::stdout().lock())
        .map_err(|error| error.to_string())
}

async fn sale(
    sales: &dyn CounterSalesService,
    action: SaleCommand,
    currency: &'static Currency,
) -> Result<(), String> {
    let sale = match action {
        SaleCommand::Complete { id } => sales.complete_sale(id).await,
        SaleCommand::Cancel { id } => sales.cancel_sale(id).await,
        SaleCommand::Refund { id } => sales.refund_sale(id).await,
        SaleCommand::Pay {
            id,
            amount,
            method,
            reference,
        } => {
            let amount = from_decimal(amount, currency)
                .ok_or_else(|| format!("payment amount out of range: {amount}"))?;
            let payment = PaymentEntry::new(amount, method, reference)
                .map_err(|error| error.to_string())?;

            sales.add_payment(id, payment.to_payload()).await
        }
    }
    .map_err(|error| error.to_string())?;

    write_sale(io::stdout().lock(), &sale, currency).map_err(|error| error.to_string())
}

fn write_sale(mut out: impl Write, sale: &Sale, currency: &'static Currency) -> io::Result<()> {
    let money = |amount: Decimal| {
        from_decimal(amount, currency).map_or_else(|| amount.to_string(), |money| money.to_string())
    };

    writeln!(out, "Sale {}: {}", sale.id, sale.status)?;
    writeln!(
        out,
        "Paid {} of {}",
        money(sale.amount_paid),
        money(sale.grand_total)
    )
}
