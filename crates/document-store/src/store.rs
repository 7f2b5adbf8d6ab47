use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{Collection, Document, ExternalId, Filter, Result, StoreError};

/// A partial update: the top-level fields to overwrite on one document.
pub type Patch = Map<String, Value>;

/// Core trait for document store implementations.
///
/// Documents are JSON objects. Each one carries its external identifier in the
/// collection's id field (see [`Collection::id_field`]); all lookups go through
/// that identifier, never a storage-internal key. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document.
    ///
    /// Fails with `Duplicate` if a document with the same identifier exists.
    async fn insert_one(&self, collection: Collection, document: Value) -> Result<()>;

    /// Retrieves a document by its external identifier.
    ///
    /// Returns None if no such document exists.
    async fn find_by_id(&self, collection: Collection, id: &ExternalId) -> Result<Option<Value>>;

    /// Retrieves every document matching the filter, in insertion order.
    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>>;

    /// Overwrites the patch's fields on an existing document and returns the
    /// updated document. Fields absent from the patch are left untouched.
    ///
    /// Fails with `NotFound` if no document has the identifier.
    async fn update_one(
        &self,
        collection: Collection,
        id: &ExternalId,
        patch: Patch,
    ) -> Result<Value>;
}

/// Typed convenience methods over any [`DocumentStore`].
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Serializes and inserts an entity.
    async fn insert<D: Document>(&self, entity: &D) -> Result<()> {
        let document = serde_json::to_value(entity)?;
        self.insert_one(D::COLLECTION, document).await
    }

    /// Loads an entity by identifier, if present.
    async fn get<D: Document>(&self, id: &ExternalId) -> Result<Option<D>> {
        match self.find_by_id(D::COLLECTION, id).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Loads an entity by identifier, failing with `NotFound` if absent.
    async fn fetch<D: Document>(&self, id: &ExternalId) -> Result<D> {
        self.get::<D>(id).await?.ok_or_else(|| StoreError::NotFound {
            collection: D::COLLECTION,
            id: id.to_string(),
        })
    }

    /// Loads every entity matching the filter.
    async fn find<D: Document>(&self, filter: &Filter) -> Result<Vec<D>> {
        self.find_many(D::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(StoreError::from))
            .collect()
    }

    /// Applies a patch and returns the updated entity.
    async fn patch<D: Document>(&self, id: &ExternalId, patch: Patch) -> Result<D> {
        let document = self.update_one(D::COLLECTION, id, patch).await?;
        Ok(serde_json::from_value(document)?)
    }
}

// Blanket implementation for all DocumentStore implementations
impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}

/// Extracts the external identifier from a document about to be inserted.
pub fn document_id(collection: Collection, document: &Value) -> Result<ExternalId> {
    document
        .get(collection.id_field())
        .and_then(Value::as_str)
        .map(ExternalId::from)
        .ok_or_else(|| {
            StoreError::InvalidDocument(format!(
                "{} document has no string {}",
                collection,
                collection.id_field()
            ))
        })
}

/// Rejects patches that would rewrite the identifier field.
pub fn validate_patch(collection: Collection, patch: &Patch) -> Result<()> {
    if patch.contains_key(collection.id_field()) {
        return Err(StoreError::InvalidDocument(format!(
            "{} cannot be reassigned",
            collection.id_field()
        )));
    }
    Ok(())
}
