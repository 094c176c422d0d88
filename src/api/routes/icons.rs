//! Icon library routes.
//!
//! All icon mutations are administrator-gated; the per-service listing lives
//! under the services router. Image bytes are uploaded to the object store by
//! a separate pipeline; these handlers only manage the catalog rows.

use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::{patch, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::services::validation::{
    IconPatchPayload, IconPayload, ReorderEntry, ReorderPayload, validate_icon_patch,
    validate_icon_payload, validate_reorder_payload,
};
use crate::storage::IconStore;

/// Request body for reordering one service's icons
#[derive(Debug, Deserialize, ToSchema)]
pub struct IconReorderRequest {
    pub service_id: String,
    pub entries: Vec<ReorderEntry>,
}

/// Create the icons router
pub fn icons_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_icon))
        .route("/reorder", patch(reorder_icons))
        .route("/{icon_id}", patch(update_icon).delete(delete_icon))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation("id", "must be a valid UUID"))
}

/// POST /icons - Register an uploaded icon
#[utoipa::path(
    post,
    path = "/icons",
    tag = "Icons",
    request_body = IconPayload,
    responses(
        (status = 200, description = "Icon created", body = Object),
        (status = 400, description = "Validation failure or unknown service"),
        (status = 403, description = "Caller is not an administrator")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_icon(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<IconPayload>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    state.check_rate_limit(auth.principal_id)?;

    let data = validate_icon_payload(&payload, auth.principal_id).map_err(ApiError::Validation)?;
    let icon = state.storage.create_icon(data).await?;

    info!(
        "[Icons] Created icon '{}' ({}) for service {}",
        icon.name, icon.id, icon.service_id
    );

    Ok(Json(json!({
        "success": true,
        "icon": icon,
        "message": "Icon created",
    })))
}

/// PATCH /icons/{icon_id} - Update an icon
#[utoipa::path(
    patch,
    path = "/icons/{icon_id}",
    tag = "Icons",
    request_body = IconPatchPayload,
    responses(
        (status = 200, description = "Icon updated", body = Object),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown icon id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_icon(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(icon_id): Path<String>,
    Json(payload): Json<IconPatchPayload>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    state.check_rate_limit(auth.principal_id)?;

    let id = parse_id(&icon_id)?;
    let patch = validate_icon_patch(&payload).map_err(ApiError::Validation)?;
    let icon = state.storage.update_icon(id, patch).await?;

    Ok(Json(json!({
        "success": true,
        "icon": icon,
        "message": "Icon updated",
    })))
}

/// DELETE /icons/{icon_id} - Delete an icon
#[utoipa::path(
    delete,
    path = "/icons/{icon_id}",
    tag = "Icons",
    responses(
        (status = 200, description = "Icon deleted", body = Object),
        (status = 400, description = "Icon is still referenced by user links"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown icon id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_icon(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(icon_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    state.check_rate_limit(auth.principal_id)?;

    let id = parse_id(&icon_id)?;
    state.storage.delete_icon(id).await?;

    info!("[Icons] Deleted icon {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Icon deleted",
    })))
}

/// PATCH /icons/reorder - Atomically reorder one service's icons
#[utoipa::path(
    patch,
    path = "/icons/reorder",
    tag = "Icons",
    request_body = IconReorderRequest,
    responses(
        (status = 200, description = "New order applied", body = Object),
        (status = 400, description = "Empty or invalid reorder list"),
        (status = 403, description = "Caller is not an administrator")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reorder_icons(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<IconReorderRequest>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    state.check_rate_limit(auth.principal_id)?;

    let service_id = Uuid::parse_str(&request.service_id)
        .map_err(|_| ApiError::validation("service_id", "must be a valid UUID"))?;
    let payload = ReorderPayload {
        entries: request.entries,
    };
    let entries = validate_reorder_payload(&payload).map_err(ApiError::Validation)?;
    state.storage.reorder_icons(service_id, &entries).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Icon order updated",
    })))
}
