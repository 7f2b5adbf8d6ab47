//! HTTP handlers, one module per resource.

pub mod foods;
pub mod health;
pub mod invoices;
pub mod menus;
pub mod metrics;
pub mod order_items;
pub mod orders;
pub mod tables;

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::ExternalId;
use document_store::{Document, DocumentStore};
use domain::EntityService;
use projections::{InvoiceAssembler, OrderViewPipeline, PageRequest, Paginator};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: DocumentStore> {
    pub entities: EntityService<S>,
    pub order_views: OrderViewPipeline<S>,
    pub invoices: InvoiceAssembler<S>,
    pub paginator: Paginator<S>,
}

/// Pagination query parameters, kept raw so bad values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "Page")]
    pub page: Option<String>,
    #[serde(rename = "recordperPage")]
    pub record_per_page: Option<String>,
    #[serde(rename = "startIndex")]
    pub start_index: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::parse(
            self.page.as_deref(),
            self.record_per_page.as_deref(),
            self.start_index.as_deref(),
        )
    }
}

/// GET /{resource} — one page of a collection as
/// `{"total_count": n, "<name>_items": [...]}`.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static, D: Document>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = state
        .paginator
        .list_page::<D>(&query.page_request())
        .await?;

    let items = page
        .items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::Domain(e.into()))?;

    let mut body = Map::new();
    if let Some(total) = page.total_count {
        body.insert("total_count".to_string(), Value::from(total));
    }
    body.insert(D::COLLECTION.items_key(), Value::Array(items));
    Ok(Json(Value::Object(body)))
}

/// GET /{resource}/{id} — one stored entity.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static, D: Document>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<D>, ApiError> {
    let entity = state.entities.get::<D>(&ExternalId::from(id)).await?;
    Ok(Json(entity))
}
