//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::CatalogError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound,
    /// Bad request from the client.
    BadRequest(String),
    /// Catalog domain error.
    Catalog(CatalogError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => detail_response(StatusCode::NOT_FOUND, "Not found."),
            ApiError::BadRequest(msg) => detail_response(StatusCode::BAD_REQUEST, &msg),
            ApiError::Catalog(err) => catalog_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                let body = serde_json::json!({ "error": "Internal server error" });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}

fn catalog_error_to_response(err: CatalogError) -> Response {
    match err {
        CatalogError::NotFound => detail_response(StatusCode::NOT_FOUND, "Not found."),
        CatalogError::Unauthenticated => {
            detail_response(StatusCode::UNAUTHORIZED, &err.to_string())
        }
        // The denial body is uniform whatever the underlying reason;
        // it must not leak whether ownership or staff status was the
        // missing piece.
        CatalogError::Forbidden => detail_response(StatusCode::FORBIDDEN, &err.to_string()),
        CatalogError::Validation { field, message } => {
            let body = serde_json::json!({ field: message });
            (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
        }
        CatalogError::Store(store_err) => store_error_to_response(store_err),
    }
}

fn store_error_to_response(err: StoreError) -> Response {
    tracing::error!(error = %err, "store error");
    let body = serde_json::json!({ "error": "Internal server error" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}

fn detail_response(status: StatusCode, detail: &str) -> Response {
    let body = serde_json::json!({ "detail": detail });
    (status, axum::Json(body)).into_response()
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}
