//! Storage module for the API.
//!
//! Provides the persistence gateway over SQLite plus the sort-order
//! subsystem shared by all ordered collections.

pub mod error;
pub mod ordering;
pub mod traits;

// Storage backend implementations
pub mod sqlite;

pub use error::StorageError;
pub use ordering::{OrderScope, OrderUpdate};
pub use sqlite::SqliteStorage;
pub use traits::{IconStore, LinkStore, ServiceStore, StorageBackend, ensure_owner};

/// Embedded schema migrations, applied on connect.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
