//! Application state management.
//!
//! Defines the AppState struct that holds all shared application state:
//! storage backend, JWT service and the per-principal rate limiter. Handlers
//! receive everything by reference through this state; nothing is ambient.

use std::sync::Arc;

use uuid::Uuid;

use super::error::ApiError;
use crate::middleware::rate_limit::{self, SharedRateLimiter};
use crate::services::jwt_service::{JwtService, SharedJwtService};
use crate::storage::{SqliteStorage, StorageBackend, StorageError};

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway for services, icons and user links
    pub storage: Arc<dyn StorageBackend>,
    /// Validates bearer tokens minted by the identity provider
    pub jwt_service: SharedJwtService,
    /// Advisory per-principal limiter consulted by mutating handlers
    pub rate_limiter: SharedRateLimiter,
}

impl AppState {
    /// Create a new application state from its injected parts.
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        jwt_service: SharedJwtService,
        rate_limiter: SharedRateLimiter,
    ) -> Self {
        Self {
            storage,
            jwt_service,
            rate_limiter,
        }
    }

    /// Initialize state from environment configuration.
    ///
    /// Connects to DATABASE_URL (default: a local SQLite file), runs pending
    /// migrations, and reads JWT_SECRET / RATE_LIMIT_PER_MINUTE.
    pub async fn from_env() -> Result<Self, StorageError> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:altee.db?mode=rwc".to_string());
        let storage = SqliteStorage::connect(&database_url).await?;

        let requests_per_minute = std::env::var("RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Ok(Self::new(
            Arc::new(storage),
            Arc::new(JwtService::from_env()),
            rate_limit::create_rate_limiter(requests_per_minute),
        ))
    }

    /// Spend one unit of the caller's mutation budget.
    pub fn check_rate_limit(&self, principal_id: Uuid) -> Result<(), ApiError> {
        rate_limit::check_rate_limit(&self.rate_limiter, principal_id)
    }
}
