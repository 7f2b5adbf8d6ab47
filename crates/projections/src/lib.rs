//! Read side of the restaurant back-office.
//!
//! Nothing here is persisted; every view is rebuilt from the stored
//! collections on request:
//! - [`OrderViewPipeline`] joins an order's line items with foods, the order
//!   and its table, then groups and totals them
//! - [`InvoiceAssembler`] merges an invoice with its order's view
//! - [`Paginator`] lists any collection one window at a time

pub mod error;
pub mod invoice_view;
pub mod listing;
pub mod order_view;

pub use error::{Result, ViewError};
pub use invoice_view::{InvoiceAssembler, InvoiceView, UNSET_PAYMENT_METHOD};
pub use listing::{Page, PageRequest, Paginator};
pub use order_view::{LineItemRow, OrderGroup, OrderViewPipeline, group_rows, project};
