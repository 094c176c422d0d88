//! Authentication context utilities.
//!
//! Provides the extractor that turns a bearer token into an authenticated
//! principal. Tokens are minted by the external identity provider; this
//! layer only validates them and never sees credentials.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;
use uuid::Uuid;

use super::app_state::AppState;
use super::error::ApiError;
use crate::models::Role;
use crate::services::jwt_service::JwtService;

/// Authentication context extracted from request
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    pub principal_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Gate for catalog mutations: administrators only.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied(
                "administrator role required".to_string(),
            ))
        }
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_bearer_token)
            .ok_or_else(|| {
                warn!("No authorization token provided");
                ApiError::AuthenticationRequired
            })?;

        let claims = state.jwt_service.validate_token(token).map_err(|e| {
            warn!("JWT validation failed: {}", e);
            ApiError::AuthenticationRequired
        })?;

        Ok(AuthContext {
            principal_id: claims.sub,
            role: claims.role,
        })
    }
}
