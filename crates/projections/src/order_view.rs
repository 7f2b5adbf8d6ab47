//! Read-time join of an order's line items with foods, orders and tables.
//!
//! The pipeline has fixed stages, run in order:
//!
//! 1. match the order items of the requested orders
//! 2. left-join each item to its food
//! 3. left-join each item to its order
//! 4. left-join the joined order to its table
//! 5. project every item into a flat [`LineItemRow`]
//!
//! and finally groups the rows by `(order_id, table_id, table_number)`.
//! Lookups that miss leave the joined fields empty; the row is kept.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use common::ExternalId;
use document_store::{DocumentStore, DocumentStoreExt, Filter, with_deadline};
use domain::{Food, Order, OrderItem, Table};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::Result;

/// One order line with its food, order and table attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemRow {
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub food_name: Option<String>,
    pub food_image: Option<String>,
    pub table_number: Option<i64>,
    pub number_of_guests: Option<i64>,
    pub table_id: Option<ExternalId>,
    pub order_id: Option<ExternalId>,
    pub quantity: i64,
}

/// The rows of one order at one table, with their total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderGroup {
    #[serde(skip)]
    pub order_id: Option<ExternalId>,
    #[serde(skip)]
    pub table_id: Option<ExternalId>,
    pub table_number: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_due: Decimal,
    pub total_count: u64,
    pub order_items: Vec<LineItemRow>,
}

/// Builds order views from the stored collections.
pub struct OrderViewPipeline<S: DocumentStore> {
    store: S,
    deadline: Duration,
}

impl<S: DocumentStore> OrderViewPipeline<S> {
    /// Creates a pipeline whose whole run is bounded by `deadline`.
    pub fn new(store: S, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Computes the grouped view of one order.
    ///
    /// An order without line items yields no groups.
    #[tracing::instrument(skip(self))]
    pub async fn compute_order_view(&self, order_id: &ExternalId) -> Result<Vec<OrderGroup>> {
        self.compute_orders_view(std::slice::from_ref(order_id))
            .await
    }

    /// Computes the grouped views of several orders in one pass.
    ///
    /// Groups come out in the order their first row was seen.
    #[tracing::instrument(skip(self), fields(orders = order_ids.len()))]
    pub async fn compute_orders_view(&self, order_ids: &[ExternalId]) -> Result<Vec<OrderGroup>> {
        let rows = with_deadline("order_view", self.deadline, self.join_rows(order_ids)).await?;

        metrics::counter!("order_views_computed").increment(1);
        metrics::histogram!("order_view_rows").record(rows.len() as f64);

        Ok(group_rows(rows))
    }

    async fn join_rows(&self, order_ids: &[ExternalId]) -> document_store::Result<Vec<LineItemRow>> {
        let items: Vec<OrderItem> = self
            .store
            .find(&Filter::field_in("order_id", ids(order_ids.iter())))
            .await?;
        tracing::debug!(items = items.len(), "matched order items");
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let foods: HashMap<ExternalId, Food> = self
            .store
            .find::<Food>(&Filter::field_in(
                "food_id",
                ids(items.iter().map(|i| &i.food_id)),
            ))
            .await?
            .into_iter()
            .map(|f| (f.food_id.clone(), f))
            .collect();

        let orders: HashMap<ExternalId, Order> = self
            .store
            .find::<Order>(&Filter::field_in(
                "order_id",
                ids(items.iter().map(|i| &i.order_id)),
            ))
            .await?
            .into_iter()
            .map(|o| (o.order_id.clone(), o))
            .collect();

        let tables: HashMap<ExternalId, Table> = self
            .store
            .find::<Table>(&Filter::field_in(
                "table_id",
                ids(orders.values().filter_map(|o| o.table_id.as_ref())),
            ))
            .await?
            .into_iter()
            .map(|t| (t.table_id.clone(), t))
            .collect();
        tracing::debug!(
            foods = foods.len(),
            orders = orders.len(),
            tables = tables.len(),
            "joined lookups"
        );

        Ok(items
            .iter()
            .map(|item| {
                let order = orders.get(&item.order_id);
                let table = order
                    .and_then(|o| o.table_id.as_ref())
                    .and_then(|id| tables.get(id));
                project(item, foods.get(&item.food_id), order, table)
            })
            .collect())
    }
}

/// Distinct identifiers as filter values, first occurrence kept.
fn ids<'a>(source: impl Iterator<Item = &'a ExternalId>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    source
        .filter(|id| seen.insert(*id))
        .map(ExternalId::as_str)
        .collect()
}

/// Flattens one joined line item.
pub fn project(
    item: &OrderItem,
    food: Option<&Food>,
    order: Option<&Order>,
    table: Option<&Table>,
) -> LineItemRow {
    LineItemRow {
        amount: food.map(|f| f.price),
        price: food.map(|f| f.price),
        food_name: food.map(|f| f.name.clone()),
        food_image: food.map(|f| f.food_image.clone()),
        table_number: table.map(|t| t.table_number),
        number_of_guests: table.map(|t| t.number_of_guests),
        table_id: table.map(|t| t.table_id.clone()),
        order_id: order.map(|o| o.order_id.clone()),
        quantity: item.quantity,
    }
}

/// Groups rows by `(order_id, table_id, table_number)`.
///
/// `payment_due` is the sum of the rows' amounts, a missing amount counting
/// as zero. Groups keep first-seen order and rows keep input order.
pub fn group_rows(rows: Vec<LineItemRow>) -> Vec<OrderGroup> {
    type Key = (Option<ExternalId>, Option<ExternalId>, Option<i64>);

    let mut index: HashMap<Key, usize> = HashMap::new();
    let mut groups: Vec<OrderGroup> = Vec::new();

    for row in rows {
        let key = (row.order_id.clone(), row.table_id.clone(), row.table_number);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(OrderGroup {
                order_id: row.order_id.clone(),
                table_id: row.table_id.clone(),
                table_number: row.table_number,
                payment_due: Decimal::ZERO,
                total_count: 0,
                order_items: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.payment_due += row.amount.unwrap_or(Decimal::ZERO);
        group.total_count += 1;
        group.order_items.push(row);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(order: &str, table: Option<(&str, i64)>, amount: Option<&str>) -> LineItemRow {
        LineItemRow {
            amount: amount.map(dec),
            price: amount.map(dec),
            food_name: amount.map(|_| "dish".to_string()),
            food_image: None,
            table_number: table.map(|(_, n)| n),
            number_of_guests: table.map(|_| 2),
            table_id: table.map(|(id, _)| ExternalId::new(id)),
            order_id: Some(ExternalId::new(order)),
            quantity: 1,
        }
    }

    #[test]
    fn rows_of_one_order_form_one_group() {
        let rows = vec![
            row("o-1", Some(("t-1", 7)), Some("4.50")),
            row("o-1", Some(("t-1", 7)), Some("1.25")),
            row("o-1", Some(("t-1", 7)), Some("3.00")),
        ];

        let groups = group_rows(rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].table_number, Some(7));
        assert_eq!(groups[0].total_count, 3);
        assert_eq!(groups[0].order_items.len(), 3);
        assert_eq!(groups[0].payment_due, dec("8.75"));
    }

    #[test]
    fn missing_amount_counts_as_zero() {
        let rows = vec![
            row("o-1", Some(("t-1", 7)), Some("2.10")),
            row("o-1", Some(("t-1", 7)), None),
        ];

        let groups = group_rows(rows);
        assert_eq!(groups[0].payment_due, dec("2.10"));
        assert_eq!(groups[0].total_count, 2);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let rows = vec![
            row("o-2", Some(("t-2", 2)), Some("1")),
            row("o-1", Some(("t-1", 1)), Some("1")),
            row("o-2", Some(("t-2", 2)), Some("1")),
        ];

        let groups = group_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].order_id, Some(ExternalId::new("o-2")));
        assert_eq!(groups[0].total_count, 2);
        assert_eq!(groups[1].order_id, Some(ExternalId::new("o-1")));
    }

    #[test]
    fn no_rows_no_groups() {
        assert!(group_rows(Vec::new()).is_empty());
    }

    #[test]
    fn projection_takes_amount_from_food_and_quantity_from_item() {
        let now = Utc::now();
        let item = OrderItem {
            order_item_id: ExternalId::new("i-1"),
            order_id: ExternalId::new("o-1"),
            food_id: ExternalId::new("f-1"),
            quantity: 3,
            unit_price: dec("5.00"),
            created_at: now,
            updated_at: now,
        };
        let food = Food {
            food_id: ExternalId::new("f-1"),
            name: "Pho".into(),
            price: dec("6.25"),
            food_image: "https://img.example/pho.png".into(),
            menu_id: ExternalId::new("m-1"),
            created_at: now,
            updated_at: now,
        };

        let joined = project(&item, Some(&food), None, None);
        assert_eq!(joined.amount, Some(dec("6.25")));
        assert_eq!(joined.price, Some(dec("6.25")));
        assert_eq!(joined.quantity, 3);
        assert_eq!(joined.order_id, None);
        assert_eq!(joined.table_number, None);

        let unjoined = project(&item, None, None, None);
        assert_eq!(unjoined.amount, None);
        assert_eq!(unjoined.food_name, None);
    }

    #[test]
    fn group_serializes_without_key_fields() {
        let groups = group_rows(vec![row("o-1", Some(("t-1", 4)), Some("2.5"))]);
        let json = serde_json::to_value(&groups[0]).unwrap();

        assert_eq!(json["table_number"], 4);
        assert_eq!(json["payment_due"], 2.5);
        assert_eq!(json["total_count"], 1);
        assert!(json.get("order_id").is_none());
        assert!(json.get("table_id").is_none());
        assert_eq!(json["order_items"][0]["amount"], 2.5);
    }
}
