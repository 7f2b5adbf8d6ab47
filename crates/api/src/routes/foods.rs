//! Food endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ExternalId;
use document_store::DocumentStore;
use domain::{Food, FoodPatch, NewFood};

use super::AppState;
use crate::error::ApiError;

/// POST /foods — the price is rounded to cents before it is stored.
#[tracing::instrument(skip(state))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewFood>,
) -> Result<(StatusCode, Json<Food>), ApiError> {
    let food = state.entities.create_food(req).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

/// PATCH /foods/{id}
#[tracing::instrument(skip(state))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<FoodPatch>,
) -> Result<Json<Food>, ApiError> {
    let food = state.entities.update_food(&ExternalId::from(id), req).await?;
    Ok(Json(food))
}
