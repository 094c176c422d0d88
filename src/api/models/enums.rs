use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rendering style of a catalog icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IconStyle {
    Filled,
    Outline,
    Minimal,
    Gradient,
    ThreeD,
}

impl IconStyle {
    /// Parse from a client-supplied string, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "FILLED" => Some(IconStyle::Filled),
            "OUTLINE" => Some(IconStyle::Outline),
            "MINIMAL" => Some(IconStyle::Minimal),
            "GRADIENT" => Some(IconStyle::Gradient),
            "THREE_D" | "3D" => Some(IconStyle::ThreeD),
            _ => None,
        }
    }
}

/// Color treatment of a catalog icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorScheme {
    Original,
    Monochrome,
    White,
    Black,
    Custom,
}

impl ColorScheme {
    /// Parse from a client-supplied string, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "ORIGINAL" => Some(ColorScheme::Original),
            "MONOCHROME" => Some(ColorScheme::Monochrome),
            "WHITE" => Some(ColorScheme::White),
            "BLACK" => Some(ColorScheme::Black),
            "CUSTOM" => Some(ColorScheme::Custom),
            _ => None,
        }
    }
}

/// Role carried by an authenticated principal.
///
/// Administrators manage the shared service/icon catalog; regular users
/// manage only their own links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}
