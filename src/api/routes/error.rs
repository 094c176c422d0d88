//! API error handling utilities.
//!
//! `ApiError` is the closed set of failures a handler can produce. Status
//! mapping is a total match over the variants; nothing inspects message text.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::services::FieldError;
use crate::storage::StorageError;

/// API error response
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input fields; carries field-level detail.
    Validation(Vec<FieldError>),
    /// No authenticated principal on the request.
    AuthenticationRequired,
    /// Principal lacks the required role or does not own the resource.
    PermissionDenied(String),
    /// Referenced entity id does not resolve.
    NotFound(String),
    /// Uniqueness violation on create or update.
    Duplicate(String),
    /// Delete blocked by existing references.
    InUse(String),
    /// Advisory per-principal rate limit tripped.
    RateLimited,
    /// Store or infrastructure failure; detail is logged, never sent.
    Internal(String),
}

impl ApiError {
    pub fn validation(field: &str, message: &str) -> Self {
        ApiError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StorageError::Duplicate { .. } => ApiError::Duplicate(err.to_string()),
            StorageError::InUse { .. } => ApiError::InUse(err.to_string()),
            StorageError::InvalidInput { field, message } => {
                ApiError::Validation(vec![FieldError { field, message }])
            }
            StorageError::NotOwner { .. } => {
                ApiError::PermissionDenied("resource is owned by another user".to_string())
            }
            StorageError::ConnectionError(detail) | StorageError::Other(detail) => {
                ApiError::Internal(detail)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": "validation failed",
                    "errors": errors,
                }),
            ),
            ApiError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "success": false,
                    "error": "authentication required",
                }),
            ),
            ApiError::PermissionDenied(message) => (
                StatusCode::FORBIDDEN,
                json!({
                    "success": false,
                    "error": message,
                }),
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                json!({
                    "success": false,
                    "error": message,
                }),
            ),
            ApiError::Duplicate(message) | ApiError::InUse(message) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": message,
                }),
            ),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "success": false,
                    "error": "too many requests",
                }),
            ),
            ApiError::Internal(detail) => {
                // Full detail stays server-side.
                error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": "internal server error",
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
