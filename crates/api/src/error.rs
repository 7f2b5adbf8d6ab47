//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use document_store::StoreError;
use domain::DomainError;
use projections::ViewError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Entity operation error.
    Domain(DomainError),
    /// View or listing error.
    View(ViewError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::View(err) => view_error_to_response(err),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "request failed");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Store(store_err) => store_error_status(store_err),
        DomainError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

fn view_error_to_response(err: ViewError) -> (StatusCode, String) {
    let status = match &err {
        ViewError::NotFound { .. } => StatusCode::NOT_FOUND,
        ViewError::ReferentialInconsistency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        ViewError::Store(store_err) => store_error_status(store_err),
    };
    (status, err.to_string())
}

fn store_error_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Duplicate { .. } => StatusCode::CONFLICT,
        StoreError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ViewError> for ApiError {
    fn from(err: ViewError) -> Self {
        ApiError::View(err)
    }
}
