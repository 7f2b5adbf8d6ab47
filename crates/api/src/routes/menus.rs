//! Menu endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ExternalId;
use document_store::DocumentStore;
use domain::{Menu, MenuPatch, NewMenu};

use super::AppState;
use crate::error::ApiError;

/// POST /menus
#[tracing::instrument(skip(state))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewMenu>,
) -> Result<(StatusCode, Json<Menu>), ApiError> {
    let menu = state.entities.create_menu(req).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

/// PATCH /menus/{id}
#[tracing::instrument(skip(state))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<MenuPatch>,
) -> Result<Json<Menu>, ApiError> {
    let menu = state.entities.update_menu(&ExternalId::from(id), req).await?;
    Ok(Json(menu))
}
