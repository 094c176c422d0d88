//! Icon entity and its write-side payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{ColorScheme, IconStyle};

/// A selectable visual asset owned by exactly one service.
///
/// Only a storage reference is kept here; the image bytes live in the
/// external object store.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Icon {
    pub id: Uuid,
    pub service_id: Uuid,
    pub name: String,
    /// Object-storage path of the uploaded asset.
    pub file_path: String,
    pub style: IconStyle,
    pub color_scheme: ColorScheme,
    pub description: Option<String>,
    pub is_active: bool,
    /// Display position within the owning service.
    pub sort_order: i64,
    /// Administrator who uploaded the asset.
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating an icon.
#[derive(Debug, Clone)]
pub struct NewIcon {
    pub service_id: Uuid,
    pub name: String,
    pub file_path: String,
    pub style: IconStyle,
    pub color_scheme: ColorScheme,
    pub description: Option<String>,
    pub is_active: bool,
    pub uploaded_by: Uuid,
}

/// Validated partial update for an icon.
///
/// The owning service is fixed at creation and cannot be patched.
#[derive(Debug, Clone, Default)]
pub struct IconPatch {
    pub name: Option<String>,
    pub file_path: Option<String>,
    pub style: Option<IconStyle>,
    pub color_scheme: Option<ColorScheme>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
