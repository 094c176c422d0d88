//! Service catalog entity and its write-side payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A linkable external platform in the shared catalog (e.g. a social network).
///
/// Services are administrator-owned and globally visible; end users reference
/// them from their own links but never mutate them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    /// URL-safe identifier, globally unique, `[a-z0-9-]+`.
    pub slug: String,
    pub description: Option<String>,
    /// Template for building link URLs, e.g. `https://twitter.com/{username}`.
    pub base_url: Option<String>,
    /// Whether links to this service may carry a user-supplied icon.
    pub allow_original_icon: bool,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a service.
#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub base_url: Option<String>,
    pub allow_original_icon: bool,
    pub is_active: bool,
}

/// Validated partial update for a service. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub base_url: Option<String>,
    pub allow_original_icon: Option<bool>,
    pub is_active: Option<bool>,
}

/// Recognized options for listing services. Unset options impose no filter.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Substring match on the display name.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub allow_original_icon: Option<bool>,
}

impl ServiceFilter {
    /// Filter used for end-user views: deactivated services are never shown.
    pub fn active_only() -> Self {
        Self {
            is_active: Some(true),
            ..Self::default()
        }
    }
}
