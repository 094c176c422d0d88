//! User link routes.
//!
//! Every operation is scoped to the authenticated principal's own rows.
//! Ownership is checked here with the shared `ensure_owner` guard and
//! re-verified inside the persistence gateway.

use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::{get, patch},
};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::services::validation::{
    LinkPatchPayload, LinkPayload, ReorderPayload, validate_link_patch, validate_link_payload,
    validate_reorder_payload,
};
use crate::storage::{LinkStore, ensure_owner};

/// Create the links router
pub fn links_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_links).post(create_link))
        .route("/reorder", patch(reorder_links))
        .route("/{link_id}", patch(update_link).delete(delete_link))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation("id", "must be a valid UUID"))
}

/// Load a link and verify the caller owns it.
async fn load_owned_link(
    state: &AppState,
    auth: &AuthContext,
    link_id: Uuid,
) -> Result<(), ApiError> {
    let link = state
        .storage
        .get_link(link_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user link not found: {}", link_id)))?;

    ensure_owner("user link", link_id, link.user_id, auth.principal_id).map_err(ApiError::from)
}

/// GET /links - List the caller's links
#[utoipa::path(
    get,
    path = "/links",
    tag = "Links",
    responses(
        (status = 200, description = "Links ordered by sort position", body = Object),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_links(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Value>, ApiError> {
    let links = state.storage.list_links(auth.principal_id).await?;

    Ok(Json(json!({
        "success": true,
        "links": links,
    })))
}

/// POST /links - Create a link on the caller's profile
#[utoipa::path(
    post,
    path = "/links",
    tag = "Links",
    request_body = LinkPayload,
    responses(
        (status = 200, description = "Link created", body = Object),
        (status = 400, description = "Validation failure or invalid reference"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_link(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<LinkPayload>,
) -> Result<Json<Value>, ApiError> {
    state.check_rate_limit(auth.principal_id)?;

    let data = validate_link_payload(&payload).map_err(ApiError::Validation)?;
    let link = state.storage.create_link(auth.principal_id, data).await?;

    info!(
        "[Links] User {} created link {} to service {}",
        auth.principal_id, link.id, link.service_id
    );

    Ok(Json(json!({
        "success": true,
        "link": link,
        "message": "Link created",
    })))
}

/// PATCH /links/{link_id} - Update one of the caller's links
#[utoipa::path(
    patch,
    path = "/links/{link_id}",
    tag = "Links",
    request_body = LinkPatchPayload,
    responses(
        (status = 200, description = "Link updated", body = Object),
        (status = 403, description = "Link belongs to another user"),
        (status = 404, description = "Unknown link id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_link(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(link_id): Path<String>,
    Json(payload): Json<LinkPatchPayload>,
) -> Result<Json<Value>, ApiError> {
    state.check_rate_limit(auth.principal_id)?;

    let id = parse_id(&link_id)?;
    load_owned_link(&state, &auth, id).await?;

    let patch = validate_link_patch(&payload).map_err(ApiError::Validation)?;
    let link = state
        .storage
        .update_link(id, auth.principal_id, patch)
        .await?;

    Ok(Json(json!({
        "success": true,
        "link": link,
        "message": "Link updated",
    })))
}

/// DELETE /links/{link_id} - Delete one of the caller's links
#[utoipa::path(
    delete,
    path = "/links/{link_id}",
    tag = "Links",
    responses(
        (status = 200, description = "Link deleted", body = Object),
        (status = 403, description = "Link belongs to another user"),
        (status = 404, description = "Unknown link id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_link(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(link_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.check_rate_limit(auth.principal_id)?;

    let id = parse_id(&link_id)?;
    load_owned_link(&state, &auth, id).await?;

    state.storage.delete_link(id, auth.principal_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Link deleted",
    })))
}

/// PATCH /links/reorder - Atomically reorder the caller's links
#[utoipa::path(
    patch,
    path = "/links/reorder",
    tag = "Links",
    request_body = ReorderPayload,
    responses(
        (status = 200, description = "New order applied", body = Object),
        (status = 400, description = "Empty or invalid reorder list"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reorder_links(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<ReorderPayload>,
) -> Result<Json<Value>, ApiError> {
    state.check_rate_limit(auth.principal_id)?;

    let entries = validate_reorder_payload(&payload).map_err(ApiError::Validation)?;
    state
        .storage
        .reorder_links(auth.principal_id, &entries)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Link order updated",
    })))
}
