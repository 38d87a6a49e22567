//! Wire schema
//!
//! Canonical request and response shapes for the sales backend. The backend has used
//! several names for the same field over time; every such fallback is resolved here, once,
//! and records that cannot be resolved are rejected with a [`NormalizeError`] rather than
//! passed on half-formed.

use std::{convert::Infallible, fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{PartNo, StockItem},
    discounts::DiscountType,
    pricing::from_decimal,
};

/// Errors normalising a backend record into its canonical shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// A stock record carried none of the identity fields.
    #[error("stock record has no part number or id (name: {0:?})")]
    MissingIdentity(Option<String>),

    /// A stock record had no part name.
    #[error("stock record {0} has no name")]
    MissingName(String),

    /// A stock record had no selling price.
    #[error("stock record {0} has no selling price")]
    MissingPrice(String),

    /// A stock record had a negative selling price.
    #[error("stock record {0} has a negative selling price")]
    NegativePrice(String),

    /// A stock record's selling price does not fit in minor units.
    #[error("stock record {0} has an out of range selling price")]
    PriceOutOfRange(String),

    /// A stock record had no stock quantity.
    #[error("stock record {0} has no stock quantity")]
    MissingQuantity(String),

    /// A stock record had a negative stock quantity.
    #[error("stock record {0} has a negative stock quantity")]
    NegativeQuantity(String),

    /// A sale record carried none of the identity fields.
    #[error("sale record has no id")]
    MissingSaleId,

    /// A sale status was not one of the known states.
    #[error("unknown sale status: {0}")]
    UnknownStatus(String),
}

/// Backend identifier of a counter sale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    /// Creates a sale id.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SaleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for SaleId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// Responses may arrive bare or wrapped in a `data` (or `sale`) member.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped {
        #[serde(alias = "sale")]
        data: T,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

/// Checkout request body for `POST /counter-sales`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    /// Customer name
    pub customer_name: String,

    /// Customer mobile number
    pub mobile: String,

    /// Vehicle registration number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,

    /// Sold lines
    pub items: Vec<SaleLinePayload>,

    /// Payments collected
    pub payments: Vec<PaymentPayload>,

    /// Bill-level discount in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub bill_discount: Decimal,
}

/// A sold line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLinePayload {
    /// Part number
    pub part_no: PartNo,

    /// Units sold
    pub quantity: u32,

    /// Unit price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Flat amount in major units, or percentage points
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// How `discount` is interpreted
    pub discount_type: DiscountType,
}

/// A payment, as sent with a checkout or on its own to a sale's payments endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Amount in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Payment method label
    pub method: String,

    /// Transaction reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Response to a sale creation. The backend may or may not echo an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "CreatedSaleRecord")]
pub struct CreatedSale {
    /// Identifier of the new sale, if returned
    pub id: Option<SaleId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSaleRecord {
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    id: Option<String>,
    sale_id: Option<String>,
}

impl From<CreatedSaleRecord> for CreatedSale {
    fn from(record: CreatedSaleRecord) -> Self {
        Self {
            id: first_present([record.sale_id, record.mongo_id, record.id]).map(SaleId),
        }
    }
}

/// Lifecycle state of a counter sale.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum SaleStatus {
    /// Created, awaiting completion
    #[default]
    Pending,

    /// Completed and invoiced
    Completed,

    /// Cancelled before completion
    Cancelled,

    /// Refunded after completion
    Refunded,
}

impl SaleStatus {
    /// Whether no further transitions are possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SaleStatus::Cancelled | SaleStatus::Refunded)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Completed => "completed",
            SaleStatus::Cancelled => "cancelled",
            SaleStatus::Refunded => "refunded",
        })
    }
}

impl TryFrom<String> for SaleStatus {
    type Error = NormalizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" | "draft" | "open" => Ok(SaleStatus::Pending),
            "completed" | "complete" | "paid" => Ok(SaleStatus::Completed),
            "cancelled" | "canceled" => Ok(SaleStatus::Cancelled),
            "refunded" => Ok(SaleStatus::Refunded),
            _ => Err(NormalizeError::UnknownStatus(value)),
        }
    }
}

/// Lifecycle transitions offered by the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SaleAction {
    /// Mark a pending sale complete
    Complete,

    /// Cancel a pending sale
    Cancel,

    /// Refund a completed sale
    Refund,
}

impl SaleAction {
    /// Path segment of the transition endpoint.
    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            SaleAction::Complete => "complete",
            SaleAction::Cancel => "cancel",
            SaleAction::Refund => "refund",
        }
    }
}

/// A counter sale as returned by the lifecycle and payment endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SaleRecord")]
pub struct Sale {
    /// Sale identifier
    pub id: SaleId,

    /// Lifecycle state
    pub status: SaleStatus,

    /// Amount due in major units
    pub grand_total: Decimal,

    /// Amount paid so far in major units
    pub amount_paid: Decimal,

    /// When the sale was created
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaleRecord {
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    id: Option<String>,
    sale_id: Option<String>,
    #[serde(default)]
    status: SaleStatus,
    grand_total: Option<Decimal>,
    total_amount: Option<Decimal>,
    amount_paid: Option<Decimal>,
    paid_amount: Option<Decimal>,
    created_at: Option<Timestamp>,
}

impl TryFrom<SaleRecord> for Sale {
    type Error = NormalizeError;

    fn try_from(record: SaleRecord) -> Result<Self, Self::Error> {
        let id = first_present([record.sale_id, record.mongo_id, record.id])
            .ok_or(NormalizeError::MissingSaleId)?;

        Ok(Self {
            id: SaleId(id),
            status: record.status,
            grand_total: record
                .grand_total
                .or(record.total_amount)
                .unwrap_or_default(),
            amount_paid: record
                .amount_paid
                .or(record.paid_amount)
                .unwrap_or_default(),
            created_at: record.created_at,
        })
    }
}

/// A stock record as listed by `GET /stock`, before normalisation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    /// Document id
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,

    /// Legacy id
    pub id: Option<String>,

    /// Part number
    pub part_number: Option<String>,

    /// Part number, older spelling
    pub part_no: Option<String>,

    /// Part name
    pub part_name: Option<String>,

    /// Selling price in major units
    pub selling_price: Option<Decimal>,

    /// Units on hand
    pub quantity: Option<Decimal>,

    /// Units on hand, older spelling
    pub stock_quantity: Option<Decimal>,
}

impl StockRecord {
    /// Normalise into a [`StockItem`] priced in `currency`.
    ///
    /// The part number is taken from `partNumber`, then `partNo`, then `_id`, then `id`.
    /// Fractional stock quantities are truncated.
    ///
    /// # Errors
    ///
    /// Returns a [`NormalizeError`] naming the first missing or invalid field.
    pub fn normalize(self, currency: &Currency) -> Result<StockItem<'_>, NormalizeError> {
        let name = self
            .part_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let part_no = first_present([self.part_number, self.part_no, self.mongo_id, self.id])
            .ok_or_else(|| NormalizeError::MissingIdentity(name.clone()))?;

        let name = name.ok_or_else(|| NormalizeError::MissingName(part_no.clone()))?;

        let price = self
            .selling_price
            .ok_or_else(|| NormalizeError::MissingPrice(part_no.clone()))?;

        if price.is_sign_negative() && !price.is_zero() {
            return Err(NormalizeError::NegativePrice(part_no));
        }

        let selling_price = from_decimal(price, currency)
            .ok_or_else(|| NormalizeError::PriceOutOfRange(part_no.clone()))?;

        let quantity = self
            .quantity
            .or(self.stock_quantity)
            .ok_or_else(|| NormalizeError::MissingQuantity(part_no.clone()))?;

        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(NormalizeError::NegativeQuantity(part_no));
        }

        let quantity_on_hand = quantity.trunc().to_u64().unwrap_or(u64::MAX);

        Ok(StockItem {
            part_no: PartNo::from(part_no),
            name,
            selling_price,
            quantity_on_hand,
        })
    }
}

/// Normalise a whole stock listing, failing on the first bad record.
///
/// # Errors
///
/// Returns the [`NormalizeError`] of the first record that cannot be normalised.
pub fn normalize_stock(
    records: Vec<StockRecord>,
    currency: &Currency,
) -> Result<Vec<StockItem<'_>>, NormalizeError> {
    records
        .into_iter()
        .map(|record| record.normalize(currency))
        .collect()
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Extract the human-readable message from an error response body.
///
/// Prefers a JSON `message` field, then `error`, then the raw body text.
pub(crate) fn backend_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = first_present([parsed.message, parsed.error]) {
            return Some(message);
        }
    }

    let trimmed = body.trim();

    (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
