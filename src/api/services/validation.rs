//! Payload validation and normalization.
//!
//! Validators are pure and synchronous: the same input always yields the same
//! normalized payload or the same list of field errors. Uniqueness and
//! referential checks need a store lookup and live in the persistence
//! gateway, not here.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    ColorScheme, IconPatch, IconStyle, NewIcon, NewService, NewUserLink, ServicePatch,
    UserLinkPatch,
};
use crate::storage::OrderUpdate;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9-]+$").expect("slug pattern is valid"));

/// One field-level validation failure, returned to the client verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

fn field_error(field: impl Into<String>, message: impl Into<String>) -> FieldError {
    FieldError {
        field: field.into(),
        message: message.into(),
    }
}

fn parse_uuid(field: &str, value: &str, errors: &mut Vec<FieldError>) -> Option<Uuid> {
    match Uuid::parse_str(value) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(field_error(field, "must be a valid UUID"));
            None
        }
    }
}

fn check_url(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(field_error(field, "is required"));
    } else if !value.starts_with("http://") && !value.starts_with("https://") {
        errors.push(field_error(field, "must start with http:// or https://"));
    }
}

/// Untrusted body for creating a service.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ServicePayload {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub allow_original_icon: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub fn validate_service_payload(input: &ServicePayload) -> Result<NewService, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.push(field_error("name", "is required"));
    }

    if input.slug.is_empty() {
        errors.push(field_error("slug", "is required"));
    } else if !SLUG_RE.is_match(&input.slug) {
        errors.push(field_error(
            "slug",
            "may only contain lowercase letters, digits and hyphens",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewService {
        name: name.to_string(),
        slug: input.slug.clone(),
        description: input.description.clone(),
        base_url: input.base_url.clone(),
        allow_original_icon: input.allow_original_icon.unwrap_or(true),
        is_active: input.is_active.unwrap_or(true),
    })
}

/// Untrusted body for patching a service. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ServicePatchPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub allow_original_icon: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub fn validate_service_patch(
    input: &ServicePatchPayload,
) -> Result<ServicePatch, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = input.name.as_ref().map(|n| n.trim().to_string());
    if let Some(name) = &name
        && name.is_empty()
    {
        errors.push(field_error("name", "must not be empty"));
    }

    if let Some(slug) = &input.slug
        && !SLUG_RE.is_match(slug)
    {
        errors.push(field_error(
            "slug",
            "may only contain lowercase letters, digits and hyphens",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ServicePatch {
        name,
        slug: input.slug.clone(),
        description: input.description.clone(),
        base_url: input.base_url.clone(),
        allow_original_icon: input.allow_original_icon,
        is_active: input.is_active,
    })
}

/// Untrusted body for creating an icon. Enum fields arrive as strings and are
/// parsed against their closed sets.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IconPayload {
    pub name: String,
    pub service_id: String,
    pub file_path: String,
    pub style: String,
    pub color_scheme: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub fn validate_icon_payload(
    input: &IconPayload,
    uploaded_by: Uuid,
) -> Result<NewIcon, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.push(field_error("name", "is required"));
    }
    if input.file_path.trim().is_empty() {
        errors.push(field_error("file_path", "is required"));
    }

    let service_id = parse_uuid("service_id", &input.service_id, &mut errors);

    let style = IconStyle::parse(&input.style);
    if style.is_none() {
        errors.push(field_error(
            "style",
            "must be one of FILLED, OUTLINE, MINIMAL, GRADIENT, THREE_D",
        ));
    }
    let color_scheme = ColorScheme::parse(&input.color_scheme);
    if color_scheme.is_none() {
        errors.push(field_error(
            "color_scheme",
            "must be one of ORIGINAL, MONOCHROME, WHITE, BLACK, CUSTOM",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewIcon {
        service_id: service_id.expect("validated above"),
        name: name.to_string(),
        file_path: input.file_path.clone(),
        style: style.expect("validated above"),
        color_scheme: color_scheme.expect("validated above"),
        description: input.description.clone(),
        is_active: input.is_active.unwrap_or(true),
        uploaded_by,
    })
}

/// Untrusted body for patching an icon.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IconPatchPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub fn validate_icon_patch(input: &IconPatchPayload) -> Result<IconPatch, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = input.name.as_ref().map(|n| n.trim().to_string());
    if let Some(name) = &name
        && name.is_empty()
    {
        errors.push(field_error("name", "must not be empty"));
    }

    let style = match &input.style {
        Some(raw) => match IconStyle::parse(raw) {
            Some(style) => Some(style),
            None => {
                errors.push(field_error(
                    "style",
                    "must be one of FILLED, OUTLINE, MINIMAL, GRADIENT, THREE_D",
                ));
                None
            }
        },
        None => None,
    };
    let color_scheme = match &input.color_scheme {
        Some(raw) => match ColorScheme::parse(raw) {
            Some(scheme) => Some(scheme),
            None => {
                errors.push(field_error(
                    "color_scheme",
                    "must be one of ORIGINAL, MONOCHROME, WHITE, BLACK, CUSTOM",
                ));
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(IconPatch {
        name,
        file_path: input.file_path.clone(),
        style,
        color_scheme,
        description: input.description.clone(),
        is_active: input.is_active,
    })
}

/// Untrusted body for creating a user link.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LinkPayload {
    pub service_id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Catalog icon id; an empty string means "no icon".
    #[serde(default)]
    pub icon_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub use_original_icon: Option<bool>,
    #[serde(default)]
    pub original_icon_url: Option<String>,
}

pub fn validate_link_payload(input: &LinkPayload) -> Result<NewUserLink, Vec<FieldError>> {
    let mut errors = Vec::new();

    let service_id = parse_uuid("service_id", &input.service_id, &mut errors);
    check_url("url", &input.url, &mut errors);

    // "" normalizes to no icon, never the literal empty string.
    let icon_id = match input.icon_id.as_deref() {
        None | Some("") => None,
        Some(raw) => parse_uuid("icon_id", raw, &mut errors),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewUserLink {
        service_id: service_id.expect("validated above"),
        icon_id,
        url: input.url.clone(),
        title: input.title.clone(),
        description: input.description.clone(),
        is_active: input.is_active.unwrap_or(true),
        use_original_icon: input.use_original_icon.unwrap_or(false),
        original_icon_url: input.original_icon_url.clone(),
    })
}

/// Untrusted body for patching a user link.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LinkPatchPayload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Absent leaves the icon unchanged; an empty string clears it.
    #[serde(default)]
    pub icon_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub use_original_icon: Option<bool>,
    #[serde(default)]
    pub original_icon_url: Option<String>,
}

pub fn validate_link_patch(input: &LinkPatchPayload) -> Result<UserLinkPatch, Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(url) = &input.url {
        check_url("url", url, &mut errors);
    }

    let icon_id = match input.icon_id.as_deref() {
        None => None,
        Some("") => Some(None),
        Some(raw) => parse_uuid("icon_id", raw, &mut errors).map(Some),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UserLinkPatch {
        url: input.url.clone(),
        title: input.title.clone(),
        description: input.description.clone(),
        icon_id,
        is_active: input.is_active,
        use_original_icon: input.use_original_icon,
        original_icon_url: input.original_icon_url.clone(),
    })
}

/// One `{id, sort_order}` pair of a reorder request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderEntry {
    pub id: String,
    pub sort_order: i64,
}

/// Untrusted body for a bulk reorder.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderPayload {
    pub entries: Vec<ReorderEntry>,
}

pub fn validate_reorder_payload(
    input: &ReorderPayload,
) -> Result<Vec<OrderUpdate>, Vec<FieldError>> {
    let mut errors = Vec::new();

    if input.entries.is_empty() {
        return Err(vec![field_error("entries", "must not be empty")]);
    }

    let mut updates = Vec::with_capacity(input.entries.len());
    for (index, entry) in input.entries.iter().enumerate() {
        let id = parse_uuid(&format!("entries[{}].id", index), &entry.id, &mut errors);
        if entry.sort_order < 0 {
            errors.push(field_error(
                format!("entries[{}].sort_order", index),
                "must be a non-negative integer",
            ));
        }
        if let Some(id) = id {
            updates.push(OrderUpdate {
                id,
                sort_order: entry.sort_order,
            });
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(updates)
}
