use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    Collection, Condition, ExternalId, Filter, Result, StoreError,
    store::{DocumentStore, Patch, document_id, validate_patch},
};

/// PostgreSQL-backed document store implementation.
///
/// All collections share one `documents` table; a document is a JSONB body
/// keyed by `(collection, external_id)`. `seq` preserves insertion order.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Appends one `AND` predicate per condition, numbering parameters from `next_param`.
fn push_conditions(sql: &mut String, filter: &Filter, mut next_param: usize) {
    for condition in filter.conditions() {
        match condition {
            Condition::Eq { .. } => {
                sql.push_str(&format!(
                    " AND body -> ${} = ${}",
                    next_param,
                    next_param + 1
                ));
            }
            Condition::In { .. } => {
                sql.push_str(&format!(
                    " AND body -> ${} IN (SELECT jsonb_array_elements(${}))",
                    next_param,
                    next_param + 1
                ));
            }
        }
        next_param += 2;
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert_one(&self, collection: Collection, document: Value) -> Result<()> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument(format!(
                "{collection} document must be a JSON object"
            )));
        }
        let id = document_id(collection, &document)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, external_id, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection.name())
        .bind(id.as_str())
        .bind(&document)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("unique_collection_external_id")
            {
                return StoreError::Duplicate {
                    collection,
                    id: id.to_string(),
                };
            }
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, collection: Collection, id: &ExternalId) -> Result<Option<Value>> {
        let body: Option<Value> = sqlx::query_scalar(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND external_id = $2
            "#,
        )
        .bind(collection.name())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(body)
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>> {
        let mut sql = String::from("SELECT body FROM documents WHERE collection = $1");
        push_conditions(&mut sql, filter, 2);
        sql.push_str(" ORDER BY seq ASC");

        let mut query = sqlx::query_scalar::<_, Value>(&sql).bind(collection.name());
        for condition in filter.conditions() {
            query = match condition {
                Condition::Eq { field, value } => query.bind(field.as_str()).bind(value.clone()),
                Condition::In { field, values } => query
                    .bind(field.as_str())
                    .bind(Value::Array(values.clone())),
            };
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &ExternalId,
        patch: Patch,
    ) -> Result<Value> {
        validate_patch(collection, &patch)?;

        let updated: Option<Value> = sqlx::query_scalar(
            r#"
            UPDATE documents
            SET body = body || $3
            WHERE collection = $1 AND external_id = $2
            RETURNING body
            "#,
        )
        .bind(collection.name())
        .bind(id.as_str())
        .bind(Value::Object(patch))
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| StoreError::NotFound {
            collection,
            id: id.to_string(),
        })
    }
}
