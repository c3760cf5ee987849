//! Brand entity model and DTOs.

use kittie_core::types::{DbId, Timestamp, UserId};
use kittie_core::validation::{validate_hex_color, validate_http_url, validate_name, validate_slug};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `brands` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brand {
    pub id: DbId,
    pub user_id: UserId,
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a brand. A slug is derived from the name when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBrand {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(custom(function = "validate_http_url"))]
    pub website: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// DTO for updating a brand. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBrand {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(custom(function = "validate_http_url"))]
    pub website: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
