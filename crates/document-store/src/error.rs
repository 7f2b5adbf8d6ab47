use std::time::Duration;

use thiserror::Error;

use crate::Collection;

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with the given external identifier exists.
    #[error("{collection} {id} not found")]
    NotFound { collection: Collection, id: String },

    /// A document with the same external identifier already exists.
    #[error("{collection} {id} already exists")]
    Duplicate { collection: Collection, id: String },

    /// The operation did not finish before its deadline.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The document or patch is not a JSON object, or lacks its id field.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout { .. })
    }
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
