use chrono::{DateTime, Utc};
use common::ExternalId;
use document_store::{Collection, Document};
use serde::{Deserialize, Serialize};

/// An order, optionally seated at a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: ExternalId,
    #[serde(default)]
    pub table_id: Option<ExternalId>,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Order {
    const COLLECTION: Collection = Collection::Orders;

    fn external_id(&self) -> &ExternalId {
        &self.order_id
    }
}

impl Order {
    /// Builds a new order. The order date defaults to `now`.
    pub fn new(input: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            order_id: ExternalId::generate(),
            table_id: input.table_id,
            order_date: input.order_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating an order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub table_id: Option<ExternalId>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
}

/// Partial update for an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<ExternalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_date_defaults_to_now() {
        let now = Utc::now();
        let order = Order::new(NewOrder::default(), now);
        assert_eq!(order.order_date, now);
        assert!(order.table_id.is_none());
    }

    #[test]
    fn missing_table_deserializes_as_none() {
        let json = serde_json::json!({
            "order_id": "o-1",
            "order_date": "2026-01-01T12:00:00Z",
            "created_at": "2026-01-01T12:00:00Z",
            "updated_at": "2026-01-01T12:00:00Z",
        });
        let order: Order = serde_json::from_value(json).unwrap();
        assert!(order.table_id.is_none());
    }
}
