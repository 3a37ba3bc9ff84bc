//! Point-of-sale order pipeline.
//!
//! Accumulates line items into an in-progress [`Cart`], converts a
//! completed cart into an immutable [`Order`] with a date-scoped order
//! number via [`Checkout`], persists it atomically through the
//! [`OrderStore`], and aggregates persisted orders into daily and monthly
//! sales summaries with the [`ReportAggregator`].
//!
//! One till, one logical writer: callers serialize cart mutations and
//! checkout calls. Everything durable goes through a single SQLite
//! database owned by the store.

pub mod domain;
pub mod report;
pub mod store;

pub use domain::cart::{Cart, CartEvent};
pub use domain::order::{
    Checkout, CheckoutError, CheckoutEvent, LineItem, Order, OrderStatus, PaymentType, Receipt,
};
pub use report::{DailyReport, ReportAggregator, ReportEvent};
pub use store::{CatalogSource, Category, OrderStore, Product, SqliteCatalog};
