//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ExternalId;
use document_store::DocumentStore;
use domain::{NewOrder, Order, OrderPatch};

use super::AppState;
use crate::error::ApiError;

/// POST /orders — an empty order, optionally seated at a table.
#[tracing::instrument(skip(state))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.entities.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PATCH /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .entities
        .update_order(&ExternalId::from(id), req)
        .await?;
    Ok(Json(order))
}
