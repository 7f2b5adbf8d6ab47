use chrono::{DateTime, Utc};
use common::{ExternalId, round_to_cents};
use document_store::{Collection, Document};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::food::validate_price;
use crate::error::ValidationError;

/// One line of an order.
///
/// `unit_price` is the food price captured when the line was created. It
/// only changes through an explicit update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: ExternalId,
    pub order_id: ExternalId,
    pub food_id: ExternalId,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for OrderItem {
    const COLLECTION: Collection = Collection::OrderItems;

    fn external_id(&self) -> &ExternalId {
        &self.order_item_id
    }
}

impl OrderItem {
    /// Builds a line with the given price snapshot, rounded to cents.
    pub fn new(
        order_id: ExternalId,
        food_id: ExternalId,
        quantity: i64,
        unit_price: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            order_item_id: ExternalId::generate(),
            order_id,
            food_id,
            quantity,
            unit_price: round_to_cents(unit_price),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for adding a single line to an existing order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub order_id: ExternalId,
    #[serde(flatten)]
    pub line: LineItemInput,
}

/// One requested line. Without a `unit_price` the food's current price is used.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemInput {
    pub food_id: ExternalId,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

impl LineItemInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quantity(self.quantity)?;
        match self.unit_price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }
}

/// Payload for opening an order and adding its lines in one request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItems {
    #[serde(default)]
    pub table_id: Option<ExternalId>,
    pub order_items: Vec<LineItemInput>,
}

impl NewOrderItems {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.order_items.is_empty() {
            return Err(ValidationError::NoLineItems);
        }
        self.order_items.iter().try_for_each(LineItemInput::validate)
    }
}

/// Partial update for an order line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_id: Option<ExternalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<Decimal>,
}

impl OrderItemPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        match self.unit_price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }

    pub fn rounded(mut self) -> Self {
        self.unit_price = self.unit_price.map(round_to_cents);
        self
    }
}

fn validate_quantity(quantity: i64) -> Result<(), ValidationError> {
    if quantity < 1 {
        return Err(ValidationError::InvalidQuantity { quantity });
    }
    Ok(())
}
