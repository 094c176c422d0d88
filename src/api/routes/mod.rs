//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod auth_context;
pub mod error;
pub mod icons;
pub mod links;
pub mod openapi;
pub mod services;

use axum::Router;

pub use app_state::AppState;
pub use auth_context::AuthContext;
pub use error::ApiError;

/// Create the main API router combining all route modules
///
/// State is applied by callers (e.g. `.with_state(app_state)` in main, or a
/// TestServer in integration tests).
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/services", services::services_router())
        .nest("/icons", icons::icons_router())
        .nest("/links", links::links_router())
        .merge(openapi::openapi_router())
}
