//! Invoice endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ExternalId;
use document_store::DocumentStore;
use domain::{Invoice, InvoicePatch, NewInvoice};
use projections::InvoiceView;

use super::AppState;
use crate::error::ApiError;

/// GET /invoices/{id} — the invoice merged with its order's view.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceView>, ApiError> {
    let view = state
        .invoices
        .build_invoice_view(&ExternalId::from(id))
        .await?;
    Ok(Json(view))
}

/// POST /invoices
#[tracing::instrument(skip(state))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewInvoice>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    let invoice = state.entities.create_invoice(req).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// PATCH /invoices/{id} — only the fields present in the body change.
#[tracing::instrument(skip(state))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<InvoicePatch>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = state
        .entities
        .update_invoice(&ExternalId::from(id), req)
        .await?;
    Ok(Json(invoice))
}
