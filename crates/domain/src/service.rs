//! Entity service providing create/get/update for every stored entity.

use chrono::Utc;
use common::ExternalId;
use document_store::{
    Deadlines, Document, DocumentStore, DocumentStoreExt, Filter, with_deadline,
};

use crate::entities::{
    Food, FoodPatch, Invoice, InvoicePatch, LineItemInput, Menu, MenuPatch, NewFood, NewInvoice,
    NewMenu, NewOrder, NewOrderItem, NewOrderItems, NewTable, Order, OrderItem, OrderItemPatch,
    OrderPatch, Table, TablePatch, patch_from,
};
use crate::error::{Result, ValidationError};

/// Service for reading and writing individual entities.
///
/// Every store call runs under the matching deadline. Updates only touch the
/// fields present in the patch and always refresh `updated_at`; updating an
/// unknown identifier fails with `NotFound`.
#[derive(Clone)]
pub struct EntityService<S: DocumentStore> {
    store: S,
    deadlines: Deadlines,
}

impl<S: DocumentStore> EntityService<S> {
    /// Creates a new entity service over the given store.
    pub fn new(store: S, deadlines: Deadlines) -> Self {
        Self { store, deadlines }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn deadlines(&self) -> Deadlines {
        self.deadlines
    }

    /// Loads an entity by identifier, failing with `NotFound` if absent.
    #[tracing::instrument(skip(self))]
    pub async fn get<D: Document>(&self, id: &ExternalId) -> Result<D> {
        let entity = with_deadline("find_by_id", self.deadlines.read, self.store.fetch::<D>(id))
            .await?;
        Ok(entity)
    }

    // Tables

    #[tracing::instrument(skip(self))]
    pub async fn create_table(&self, input: NewTable) -> Result<Table> {
        input.validate()?;
        self.ensure_table_number_free(input.table_number, None)
            .await?;

        let table = Table::new(input, Utc::now());
        self.insert(&table).await?;
        Ok(table)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_table(&self, id: &ExternalId, patch: TablePatch) -> Result<Table> {
        patch.validate()?;
        if let Some(table_number) = patch.table_number {
            self.ensure_table_number_free(table_number, Some(id))
                .await?;
        }
        self.update(id, &patch).await
    }

    // Menus

    #[tracing::instrument(skip(self))]
    pub async fn create_menu(&self, input: NewMenu) -> Result<Menu> {
        let now = Utc::now();
        input.validate(now)?;

        let menu = Menu::new(input, now);
        self.insert(&menu).await?;
        Ok(menu)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_menu(&self, id: &ExternalId, patch: MenuPatch) -> Result<Menu> {
        patch.validate(Utc::now())?;
        self.update(id, &patch).await
    }

    // Foods

    #[tracing::instrument(skip(self))]
    pub async fn create_food(&self, input: NewFood) -> Result<Food> {
        input.validate()?;
        self.ensure_exists::<Menu>(&input.menu_id).await?;

        let food = Food::new(input, Utc::now());
        self.insert(&food).await?;
        Ok(food)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_food(&self, id: &ExternalId, patch: FoodPatch) -> Result<Food> {
        patch.validate()?;
        if let Some(menu_id) = &patch.menu_id {
            self.ensure_exists::<Menu>(menu_id).await?;
        }
        self.update(id, &patch.rounded()).await
    }

    // Orders

    #[tracing::instrument(skip(self))]
    pub async fn create_order(&self, input: NewOrder) -> Result<Order> {
        if let Some(table_id) = &input.table_id {
            self.ensure_exists::<Table>(table_id).await?;
        }

        let order = Order::new(input, Utc::now());
        self.insert(&order).await?;
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_order(&self, id: &ExternalId, patch: OrderPatch) -> Result<Order> {
        if let Some(table_id) = &patch.table_id {
            self.ensure_exists::<Table>(table_id).await?;
        }
        self.update(id, &patch).await
    }

    // Order items

    /// Adds one line to an existing order.
    #[tracing::instrument(skip(self))]
    pub async fn create_order_item(&self, input: NewOrderItem) -> Result<OrderItem> {
        input.line.validate()?;
        self.ensure_exists::<Order>(&input.order_id).await?;

        let item = self.price_line(&input.order_id, &input.line).await?;
        self.insert(&item).await?;
        Ok(item)
    }

    /// Opens a new order for the table and adds every requested line to it.
    ///
    /// All foods are resolved before anything is written, so an unknown food
    /// leaves no order behind.
    #[tracing::instrument(skip(self), fields(lines = input.order_items.len()))]
    pub async fn create_order_with_items(
        &self,
        input: NewOrderItems,
    ) -> Result<(Order, Vec<OrderItem>)> {
        input.validate()?;
        if let Some(table_id) = &input.table_id {
            self.ensure_exists::<Table>(table_id).await?;
        }

        let now = Utc::now();
        let order = Order::new(
            NewOrder {
                table_id: input.table_id.clone(),
                order_date: None,
            },
            now,
        );

        let mut items = Vec::with_capacity(input.order_items.len());
        for line in &input.order_items {
            items.push(self.price_line(&order.order_id, line).await?);
        }

        self.insert(&order).await?;
        for item in &items {
            self.insert(item).await?;
        }

        tracing::info!(order_id = %order.order_id, lines = items.len(), "order opened with items");
        Ok((order, items))
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_order_item(
        &self,
        id: &ExternalId,
        patch: OrderItemPatch,
    ) -> Result<OrderItem> {
        patch.validate()?;
        if let Some(food_id) = &patch.food_id {
            self.ensure_exists::<Food>(food_id).await?;
        }
        self.update(id, &patch.rounded()).await
    }

    // Invoices

    #[tracing::instrument(skip(self))]
    pub async fn create_invoice(&self, input: NewInvoice) -> Result<Invoice> {
        let order = self.resolve::<Order>(&input.order_id).await?;
        if order.table_id.is_none() {
            return Err(ValidationError::OrderWithoutTable {
                order_id: order.order_id.to_string(),
            }
            .into());
        }

        let invoice = Invoice::new(input, Utc::now());
        self.insert(&invoice).await?;
        Ok(invoice)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_invoice(&self, id: &ExternalId, patch: InvoicePatch) -> Result<Invoice> {
        if let Some(order_id) = &patch.order_id {
            self.ensure_exists::<Order>(order_id).await?;
        }
        self.update(id, &patch).await
    }

    // Helpers

    /// Builds an order line, snapshotting the food's current price when the
    /// request did not carry one.
    async fn price_line(&self, order_id: &ExternalId, line: &LineItemInput) -> Result<OrderItem> {
        let food = self.resolve::<Food>(&line.food_id).await?;
        let unit_price = line.unit_price.unwrap_or(food.price);

        Ok(OrderItem::new(
            order_id.clone(),
            food.food_id,
            line.quantity,
            unit_price,
            Utc::now(),
        ))
    }

    /// Loads a referenced entity, reporting a missing one as a validation failure.
    async fn resolve<D: Document>(&self, id: &ExternalId) -> Result<D> {
        let found = with_deadline("find_by_id", self.deadlines.read, self.store.get::<D>(id))
            .await?;
        found.ok_or_else(|| {
            ValidationError::UnknownReference {
                collection: D::COLLECTION,
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn ensure_exists<D: Document>(&self, id: &ExternalId) -> Result<()> {
        self.resolve::<D>(id).await.map(|_| ())
    }

    async fn ensure_table_number_free(
        &self,
        table_number: i64,
        except: Option<&ExternalId>,
    ) -> Result<()> {
        let taken = with_deadline(
            "find_many",
            self.deadlines.read,
            self.store
                .find::<Table>(&Filter::field_eq("table_number", table_number)),
        )
        .await?;

        if taken.iter().any(|t| Some(&t.table_id) != except) {
            return Err(ValidationError::DuplicateTableNumber { table_number }.into());
        }
        Ok(())
    }

    async fn insert<D: Document>(&self, entity: &D) -> Result<()> {
        with_deadline("insert_one", self.deadlines.write, self.store.insert(entity)).await?;
        metrics::counter!("entities_created", "collection" => D::COLLECTION.name()).increment(1);
        tracing::debug!(collection = %D::COLLECTION, id = %entity.external_id(), "entity created");
        Ok(())
    }

    async fn update<D, P>(&self, id: &ExternalId, fields: &P) -> Result<D>
    where
        D: Document,
        P: serde::Serialize,
    {
        let patch = patch_from(fields, Utc::now())?;
        let updated = with_deadline(
            "update_one",
            self.deadlines.write,
            self.store.patch::<D>(id, patch),
        )
        .await?;
        metrics::counter!("entities_updated", "collection" => D::COLLECTION.name()).increment(1);
        Ok(updated)
    }
}
