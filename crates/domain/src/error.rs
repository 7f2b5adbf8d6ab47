//! Domain error types.

use document_store::{Collection, StoreError};
use rust_decimal::Decimal;
use thiserror::Error;

/// A request payload broke one of the entity rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required text field is blank.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// Tables seat at least one guest.
    #[error("Invalid number of guests: {guests} (must be at least 1)")]
    InvalidGuestCount { guests: i64 },

    /// Another table already uses this number.
    #[error("Table number {table_number} is already taken")]
    DuplicateTableNumber { table_number: i64 },

    /// Prices must be positive.
    #[error("Invalid price: {price} (must be greater than 0)")]
    InvalidPrice { price: Decimal },

    /// Line quantities must be positive.
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: i64 },

    /// A menu window needs both a start and an end.
    #[error("Menu start_date and end_date must be given together")]
    IncompleteMenuWindow,

    /// A menu window cannot open in the past.
    #[error("Menu start_date has already passed")]
    MenuStartInPast,

    /// A menu window must close after it opens.
    #[error("Menu end_date must be after start_date")]
    MenuEndBeforeStart,

    /// A referenced entity does not exist.
    #[error("Referenced {collection} {id} does not exist")]
    UnknownReference { collection: Collection, id: String },

    /// Only orders seated at a table can be invoiced.
    #[error("Order {order_id} has no table and cannot be invoiced")]
    OrderWithoutTable { order_id: String },

    /// An order-with-items request carried no items.
    #[error("At least one order item is required")]
    NoLineItems,
}

/// Errors that can occur during entity operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the document store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The request broke an entity rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Returns true if the addressed entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::Store(StoreError::NotFound { .. }))
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
