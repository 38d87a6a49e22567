//! Catalog
//!
//! The addable stock catalog, populated from the backend's stock listing. Items are
//! normalised at the wire boundary (see [`crate::client::wire`]) before they get here, so
//! everything in a catalog has a part number, a name, a price and a stock count.

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::debug;

use crate::sequence::{Sequencer, Ticket};

pub mod table;

new_key_type! {
    /// Stock Key
    pub struct StockKey;
}

/// Part number, the identity of a stock item and of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartNo(String);

impl PartNo {
    /// Creates a part number.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The part number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartNo {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PartNo {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A sellable stock item.
#[derive(Debug, Clone, PartialEq)]
pub struct StockItem<'a> {
    /// Part number
    pub part_no: PartNo,

    /// Part name
    pub name: String,

    /// Selling price per unit
    pub selling_price: Money<'a, Currency>,

    /// Units on hand
    pub quantity_on_hand: u64,
}

impl StockItem<'_> {
    /// Whether any units are on hand.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.quantity_on_hand > 0
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.part_no.as_str().to_lowercase().contains(needle)
    }
}

/// Errors building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The same part number appeared twice in one listing.
    #[error("duplicate part number in stock listing: {0}")]
    DuplicatePartNo(PartNo),
}

/// Catalog of stock items keyed by part number.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    items: SlotMap<StockKey, StockItem<'a>>,
    keys: FxHashMap<PartNo, StockKey>,
    refreshes: Sequencer,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            keys: FxHashMap::default(),
            refreshes: Sequencer::new(),
        }
    }

    /// Create a catalog from a stock listing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePartNo`] if a part number is listed twice.
    pub fn from_items(
        items: impl IntoIterator<Item = StockItem<'a>>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        let (items, keys) = index(items)?;

        catalog.items = items;
        catalog.keys = keys;

        Ok(catalog)
    }

    /// Look up an item by part number.
    #[must_use]
    pub fn get(&self, part_no: &PartNo) -> Option<&StockItem<'a>> {
        self.keys.get(part_no).and_then(|key| self.items.get(*key))
    }

    /// Case-insensitive search over part names and numbers, sorted by name.
    ///
    /// An empty query matches everything.
    #[must_use]
    pub fn search(&self, query: &str, in_stock_only: bool) -> Vec<&StockItem<'a>> {
        let needle = query.trim().to_lowercase();

        let mut found: Vec<_> = self
            .items
            .values()
            .filter(|item| !in_stock_only || item.in_stock())
            .filter(|item| needle.is_empty() || item.matches(&needle))
            .collect();

        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.part_no.cmp(&b.part_no)));

        found
    }

    /// Iterate over all items in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &StockItem<'a>> {
        self.items.values()
    }

    /// Number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Start a refresh; the returned ticket must accompany the listing it fetched.
    pub fn begin_refresh(&mut self) -> Ticket {
        self.refreshes.issue()
    }

    /// Replace the catalog with a fetched listing, unless a newer refresh has already
    /// been applied. Returns whether the listing was applied.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePartNo`] if a part number is listed twice; the
    /// catalog is left unchanged.
    pub fn apply_refresh(
        &mut self,
        ticket: Ticket,
        items: impl IntoIterator<Item = StockItem<'a>>,
    ) -> Result<bool, CatalogError> {
        let (items, keys) = index(items)?;

        if !self.refreshes.accept(ticket) {
            debug!(?ticket, "discarding stale stock listing");

            return Ok(false);
        }

        self.items = items;
        self.keys = keys;

        Ok(true)
    }
}

type Indexed<'a> = (SlotMap<StockKey, StockItem<'a>>, FxHashMap<PartNo, StockKey>);

fn index<'a>(items: impl IntoIterator<Item = StockItem<'a>>) -> Result<Indexed<'a>, CatalogError> {
    let mut slots = SlotMap::with_key();
    let mut keys = FxHashMap::default();

    for item in items {
        if keys.contains_key(&item.part_no) {
            return Err(CatalogError::DuplicatePartNo(item.part_no));
        }

        let part_no = item.part_no.clone();

        keys.insert(part_no, slots.insert(item));
    }

    Ok((slots, keys))
}
