//! Order item endpoints and the grouped order view.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ExternalId;
use document_store::DocumentStore;
use domain::{NewOrderItems, OrderItem, OrderItemPatch};
use projections::OrderGroup;
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct OrderItemsCreatedResponse {
    pub order_id: ExternalId,
    pub table_id: Option<ExternalId>,
    pub order_items: Vec<OrderItem>,
}

/// POST /orderItems — opens an order and adds every requested line to it.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewOrderItems>,
) -> Result<(StatusCode, Json<OrderItemsCreatedResponse>), ApiError> {
    let (order, items) = state.entities.create_order_with_items(req).await?;

    let response = OrderItemsCreatedResponse {
        order_id: order.order_id,
        table_id: order.table_id,
        order_items: items,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// PATCH /orderItems/{id}
#[tracing::instrument(skip(state))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<OrderItemPatch>,
) -> Result<Json<OrderItem>, ApiError> {
    let item = state
        .entities
        .update_order_item(&ExternalId::from(id), req)
        .await?;
    Ok(Json(item))
}

/// GET /orderItems-order/{order_id} — the order's lines joined and grouped.
#[tracing::instrument(skip(state))]
pub async fn by_order<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<String>,
) -> Result<Json<Vec<OrderGroup>>, ApiError> {
    let groups = state
        .order_views
        .compute_order_view(&ExternalId::from(order_id))
        .await?;
    Ok(Json(groups))
}
