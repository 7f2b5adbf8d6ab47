use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    Collection, ExternalId, Filter, Result, StoreError,
    store::{DocumentStore, Patch, document_id, validate_patch},
};

/// In-memory document store implementation.
///
/// Keeps each collection as an insertion-ordered vector of JSON documents and
/// provides the same interface as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Value>>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn document_count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    /// Deletes a document outside of the service layer.
    ///
    /// The back-office never deletes entities itself; this exists so callers
    /// can reproduce records disappearing underneath a join.
    pub async fn remove(&self, collection: Collection, id: &ExternalId) -> bool {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return false;
        };
        let before = documents.len();
        documents.retain(|doc| !has_id(collection, doc, id));
        documents.len() != before
    }

    /// Clears all collections.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }
}

fn has_id(collection: Collection, document: &Value, id: &ExternalId) -> bool {
    document.get(collection.id_field()).and_then(Value::as_str) == Some(id.as_str())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_one(&self, collection: Collection, document: Value) -> Result<()> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument(format!(
                "{collection} document must be a JSON object"
            )));
        }
        let id = document_id(collection, &document)?;

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        // Unique constraint simulation
        if documents.iter().any(|doc| has_id(collection, doc, &id)) {
            return Err(StoreError::Duplicate {
                collection,
                id: id.into_inner(),
            });
        }

        documents.push(document);
        Ok(())
    }

    async fn find_by_id(&self, collection: Collection, id: &ExternalId) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).and_then(|documents| {
            documents
                .iter()
                .find(|doc| has_id(collection, doc, id))
                .cloned()
        }))
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &ExternalId,
        patch: Patch,
    ) -> Result<Value> {
        validate_patch(collection, &patch)?;

        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(&collection)
            .and_then(|documents| documents.iter_mut().find(|doc| has_id(collection, doc, id)))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;

        if let Value::Object(fields) = document {
            fields.extend(patch);
        }
        Ok(document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn food(id: &str, name: &str, price: f64) -> Value {
        json!({"food_id": id, "name": name, "price": price, "menu_id": "m-1"})
    }

    #[tokio::test]
    async fn insert_and_find_by_id() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Foods, food("f-1", "Soup", 4.5))
            .await
            .unwrap();

        let found = store
            .find_by_id(Collection::Foods, &ExternalId::new("f-1"))
            .await
            .unwrap();
        assert_eq!(found.unwrap()["name"], "Soup");

        let missing = store
            .find_by_id(Collection::Foods, &ExternalId::new("f-2"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Foods, food("f-1", "Soup", 4.5))
            .await
            .unwrap();

        let menus = store
            .find_many(Collection::Menus, &Filter::all())
            .await
            .unwrap();
        assert!(menus.is_empty());
        assert_eq!(store.document_count(Collection::Foods).await, 1);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Foods, food("f-1", "Soup", 4.5))
            .await
            .unwrap();

        let result = store
            .insert_one(Collection::Foods, food("f-1", "Stew", 6.0))
            .await;
        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn insert_requires_id_field() {
        let store = InMemoryDocumentStore::new();
        let result = store
            .insert_one(Collection::Foods, json!({"name": "Soup"}))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn find_many_preserves_insertion_order() {
        let store = InMemoryDocumentStore::new();
        for i in 0..5 {
            store
                .insert_one(Collection::Foods, food(&format!("f-{i}"), "Dish", 1.0))
                .await
                .unwrap();
        }

        let all = store
            .find_many(Collection::Foods, &Filter::all())
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|d| d["food_id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["f-0", "f-1", "f-2", "f-3", "f-4"]);
    }

    #[tokio::test]
    async fn find_many_applies_filter() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Foods, food("f-1", "Soup", 4.5))
            .await
            .unwrap();
        store
            .insert_one(Collection::Foods, food("f-2", "Stew", 6.0))
            .await
            .unwrap();
        store
            .insert_one(Collection::Foods, food("f-3", "Salad", 3.0))
            .await
            .unwrap();

        let picked = store
            .find_many(Collection::Foods, &Filter::field_in("food_id", ["f-1", "f-3"]))
            .await
            .unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[tokio::test]
    async fn update_overwrites_only_patched_fields() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Foods, food("f-1", "Soup", 4.5))
            .await
            .unwrap();

        let mut patch = Patch::new();
        patch.insert("name".into(), json!("Broth"));
        let updated = store
            .update_one(Collection::Foods, &ExternalId::new("f-1"), patch)
            .await
            .unwrap();

        assert_eq!(updated["name"], "Broth");
        assert_eq!(updated["price"], 4.5);
        assert_eq!(updated["menu_id"], "m-1");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let result = store
            .update_one(Collection::Foods, &ExternalId::new("nope"), Patch::new())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_cannot_reassign_id() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Foods, food("f-1", "Soup", 4.5))
            .await
            .unwrap();

        let mut patch = Patch::new();
        patch.insert("food_id".into(), json!("f-9"));
        let result = store
            .update_one(Collection::Foods, &ExternalId::new("f-1"), patch)
            .await;
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn remove_deletes_out_of_band() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Foods, food("f-1", "Soup", 4.5))
            .await
            .unwrap();

        assert!(store.remove(Collection::Foods, &ExternalId::new("f-1")).await);
        assert!(!store.remove(Collection::Foods, &ExternalId::new("f-1")).await);
        assert_eq!(store.document_count(Collection::Foods).await, 0);
    }
}
