//! View error types.

use document_store::{Collection, StoreError};
use thiserror::Error;

/// Errors that can occur while building a view or a listing.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The entity the view is rooted at does not exist.
    #[error("{collection} {id} not found")]
    NotFound { collection: Collection, id: String },

    /// Stored records that should reference each other do not.
    #[error("Order {order_id} did not resolve while assembling its view")]
    ReferentialInconsistency { order_id: String },

    /// An error occurred in the document store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
