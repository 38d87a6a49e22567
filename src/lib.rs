//! Torque
//!
//! Torque is the counter-sales engine of a workshop ERP: a point-of-sale cart with line and
//! bill discounts, flat-rate tax, checkout form validation, and a typed REST client for the
//! sales backend.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod observability;
pub mod payments;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod sequence;
