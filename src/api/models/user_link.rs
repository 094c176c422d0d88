//! User link entity and its write-side payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One entry on a user's profile page, bound to a catalog service and
/// optionally to one of that service's icons.
///
/// Strictly single-owner: only the user identified by `user_id` may mutate
/// the row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct UserLink {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    /// Catalog icon shown for this link. Must belong to `service_id`.
    pub icon_id: Option<Uuid>,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Display position within the owning user's link list.
    pub sort_order: i64,
    pub is_active: bool,
    /// When set, the user-supplied `original_icon_url` is rendered instead of
    /// a catalog icon.
    pub use_original_icon: bool,
    pub original_icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a user link.
#[derive(Debug, Clone)]
pub struct NewUserLink {
    pub service_id: Uuid,
    pub icon_id: Option<Uuid>,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub use_original_icon: bool,
    pub original_icon_url: Option<String>,
}

/// Validated partial update for a user link.
///
/// `icon_id` distinguishes three states: `None` leaves the icon unchanged,
/// `Some(None)` clears it (a client-supplied empty string normalizes here),
/// `Some(Some(id))` selects a catalog icon. The bound service is fixed at
/// creation.
#[derive(Debug, Clone, Default)]
pub struct UserLinkPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub use_original_icon: Option<bool>,
    pub original_icon_url: Option<String>,
}
