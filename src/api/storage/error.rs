//! Storage error types for the persistence gateway.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage operation errors.
///
/// Business failures are tagged variants so the API boundary can map them to
/// status codes with an exhaustive match instead of inspecting message text.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageError {
    /// Entity not found
    #[error("{entity_type} not found: {entity_id}")]
    NotFound {
        entity_type: String,
        entity_id: String,
    },
    /// Uniqueness violation on create or update
    #[error("{entity_type} with this {field} already exists: {value}")]
    Duplicate {
        entity_type: String,
        field: String,
        value: String,
    },
    /// Delete blocked by dependent records
    #[error("{entity_type} {entity_id} is in use by {dependents} record(s)")]
    InUse {
        entity_type: String,
        entity_id: String,
        dependents: i64,
    },
    /// Input that passed shape validation but fails a store-level rule
    /// (dangling reference, cross-service icon, empty reorder list)
    #[error("invalid {field}: {message}")]
    InvalidInput { field: String, message: String },
    /// Mutating principal does not own the row
    #[error("{entity_type} {entity_id} is not owned by the caller")]
    NotOwner {
        entity_type: String,
        entity_id: String,
    },
    /// Database connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
    /// General storage error
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::ConnectionError(err.to_string())
    }
}
