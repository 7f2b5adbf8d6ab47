//! Table endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ExternalId;
use document_store::DocumentStore;
use domain::{NewTable, Table, TablePatch};

use super::AppState;
use crate::error::ApiError;

/// POST /tables
#[tracing::instrument(skip(state))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewTable>,
) -> Result<(StatusCode, Json<Table>), ApiError> {
    let table = state.entities.create_table(req).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// PATCH /tables/{id}
#[tracing::instrument(skip(state))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<TablePatch>,
) -> Result<Json<Table>, ApiError> {
    let table = state
        .entities
        .update_table(&ExternalId::from(id), req)
        .await?;
    Ok(Json(table))
}
