//! Stored entities, their creation payloads and their partial-update payloads.

mod food;
mod invoice;
mod menu;
mod order;
mod order_item;
mod table;

pub use food::{Food, FoodPatch, NewFood};
pub use invoice::{Invoice, InvoicePatch, NewInvoice, PaymentMethod, PaymentStatus};
pub use menu::{Menu, MenuPatch, NewMenu, validate_window};
pub use order::{NewOrder, Order, OrderPatch};
pub use order_item::{LineItemInput, NewOrderItem, NewOrderItems, OrderItem, OrderItemPatch};
pub use table::{NewTable, Table, TablePatch};

use chrono::{DateTime, Utc};
use document_store::Patch;
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;

/// Builds a store patch from an update payload.
///
/// Only fields present in the payload end up in the patch; `updated_at` is
/// always set.
pub(crate) fn patch_from<P: Serialize>(
    fields: &P,
    updated_at: DateTime<Utc>,
) -> Result<Patch, serde_json::Error> {
    let mut patch = match serde_json::to_value(fields)? {
        Value::Object(map) => map,
        _ => Patch::new(),
    };
    patch.insert("updated_at".to_string(), serde_json::to_value(updated_at)?);
    Ok(patch)
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}
