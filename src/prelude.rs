//! Torque prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError, PartNo, StockItem},
    checkout::{
        Checkout, CheckoutError, CheckoutOutcome,
        form::{CheckoutForm, FieldError, ValidationErrors},
    },
    client::{
        ApiClient, ApiError, ClientConfig,
        sales::{CounterSalesService, HttpCounterSalesService},
        session::{Session, SessionUser, SharedSession},
        stock::{HttpStockService, StockService},
        wire::{CheckoutPayload, CreatedSale, Sale, SaleId, SaleStatus},
    },
    discounts::{DiscountError, DiscountType, LineDiscount},
    items::CartLine,
    payments::{PaymentEntry, PaymentError, PaymentMethod},
    pricing::{TaxRate, TotalPriceError, Totals, compute_totals},
    receipt::{Receipt, ReceiptError},
    sequence::{Sequencer, Ticket},
};
