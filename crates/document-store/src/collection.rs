use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ExternalId;

/// The fixed set of collections the back-office stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Tables,
    Foods,
    Menus,
    Orders,
    OrderItems,
    Invoices,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Tables,
        Collection::Foods,
        Collection::Menus,
        Collection::Orders,
        Collection::OrderItems,
        Collection::Invoices,
    ];

    /// Storage name of the collection.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Tables => "table",
            Collection::Foods => "food",
            Collection::Menus => "menu",
            Collection::Orders => "order",
            Collection::OrderItems => "orderitem",
            Collection::Invoices => "invoice",
        }
    }

    /// Document field holding the external identifier.
    pub fn id_field(&self) -> &'static str {
        match self {
            Collection::Tables => "table_id",
            Collection::Foods => "food_id",
            Collection::Menus => "menu_id",
            Collection::Orders => "order_id",
            Collection::OrderItems => "order_item_id",
            Collection::Invoices => "invoice_id",
        }
    }

    /// Key under which a listing of this collection returns its items.
    pub fn items_key(&self) -> String {
        format!("{}_items", self.name())
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed entity stored as one document in a [`Collection`].
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the entity lives in.
    const COLLECTION: Collection;

    /// The entity's external identifier.
    fn external_id(&self) -> &ExternalId;
}
