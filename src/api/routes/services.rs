//! Service catalog routes.
//!
//! Listing is open to any authenticated user (active entries only unless the
//! caller is an administrator); every mutation is administrator-gated.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json,
    routing::{get, patch},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::models::ServiceFilter;
use crate::services::validation::{
    ReorderPayload, ServicePatchPayload, ServicePayload, validate_reorder_payload,
    validate_service_patch, validate_service_payload,
};
use crate::storage::{IconStore, ServiceStore};

/// Query parameters for GET /services
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListServicesQuery {
    /// Substring match on the display name
    pub search: Option<String>,
    /// Admin-only: include or exclude deactivated services
    pub is_active: Option<bool>,
    pub allow_original_icon: Option<bool>,
}

/// Create the services router
pub fn services_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/reorder", patch(reorder_services))
        .route(
            "/{service_id}",
            patch(update_service).delete(delete_service),
        )
        .route("/{service_id}/icons", get(list_service_icons))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation("id", "must be a valid UUID"))
}

/// GET /services - List catalog services
#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    params(ListServicesQuery),
    responses(
        (status = 200, description = "Services ordered by sort position", body = Object),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_services(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListServicesQuery>,
) -> Result<Json<Value>, ApiError> {
    // End-user views never see deactivated services.
    let filter = ServiceFilter {
        search: query.search,
        is_active: if auth.is_admin() {
            query.is_active
        } else {
            Some(true)
        },
        allow_original_icon: query.allow_original_icon,
    };

    let services = state.storage.list_services(&filter).await?;

    Ok(Json(json!({
        "success": true,
        "services": services,
    })))
}

/// POST /services - Create a catalog service
#[utoipa::path(
    post,
    path = "/services",
    tag = "Services",
    request_body = ServicePayload,
    responses(
        (status = 200, description = "Service created", body = Object),
        (status = 400, description = "Validation failure or duplicate name/slug"),
        (status = 403, description = "Caller is not an administrator")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_service(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<ServicePayload>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    state.check_rate_limit(auth.principal_id)?;

    let data = validate_service_payload(&payload).map_err(ApiError::Validation)?;
    let service = state.storage.create_service(data).await?;

    info!("[Services] Created service '{}' ({})", service.name, service.id);

    Ok(Json(json!({
        "success": true,
        "service": service,
        "message": "Service created",
    })))
}

/// PATCH /services/{service_id} - Update a catalog service
#[utoipa::path(
    patch,
    path = "/services/{service_id}",
    tag = "Services",
    request_body = ServicePatchPayload,
    responses(
        (status = 200, description = "Service updated", body = Object),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown service id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_service(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(service_id): Path<String>,
    Json(payload): Json<ServicePatchPayload>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    state.check_rate_limit(auth.principal_id)?;

    let id = parse_id(&service_id)?;
    let patch = validate_service_patch(&payload).map_err(ApiError::Validation)?;
    let service = state.storage.update_service(id, patch).await?;

    Ok(Json(json!({
        "success": true,
        "service": service,
        "message": "Service updated",
    })))
}

/// DELETE /services/{service_id} - Delete a catalog service
#[utoipa::path(
    delete,
    path = "/services/{service_id}",
    tag = "Services",
    responses(
        (status = 200, description = "Service deleted", body = Object),
        (status = 400, description = "Service is still referenced by icons or links"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown service id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_service(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(service_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    state.check_rate_limit(auth.principal_id)?;

    let id = parse_id(&service_id)?;
    state.storage.delete_service(id).await?;

    info!("[Services] Deleted service {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Service deleted",
    })))
}

/// PATCH /services/reorder - Atomically apply new sort positions
#[utoipa::path(
    patch,
    path = "/services/reorder",
    tag = "Services",
    request_body = ReorderPayload,
    responses(
        (status = 200, description = "New order applied", body = Object),
        (status = 400, description = "Empty or invalid reorder list"),
        (status = 403, description = "Caller is not an administrator")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reorder_services(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<ReorderPayload>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    state.check_rate_limit(auth.principal_id)?;

    let entries = validate_reorder_payload(&payload).map_err(ApiError::Validation)?;
    state.storage.reorder_services(&entries).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Service order updated",
    })))
}

/// GET /services/{service_id}/icons - List a service's icons
#[utoipa::path(
    get,
    path = "/services/{service_id}/icons",
    tag = "Icons",
    responses(
        (status = 200, description = "Icons ordered by sort position", body = Object),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_service_icons(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(service_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&service_id)?;

    // Deactivated assets stay hidden from non-administrators.
    let icons = state.storage.list_icons(id, auth.is_admin()).await?;

    Ok(Json(json!({
        "success": true,
        "icons": icons,
    })))
}
