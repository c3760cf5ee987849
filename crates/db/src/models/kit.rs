//! Kit entity model and DTOs.

use kittie_core::types::{DbId, Timestamp, UserId};
use kittie_core::validation::{validate_hex_color, validate_name, validate_slug};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::section::SectionTree;

/// A row from the `kits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Kit {
    pub id: DbId,
    pub user_id: UserId,
    pub brand_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a kit. A slug is derived from the name when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateKit {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub brand_id: Option<DbId>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub accent_color: Option<String>,
    pub is_public: Option<bool>,
}

/// DTO for updating a kit. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateKit {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub brand_id: Option<DbId>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub accent_color: Option<String>,
    pub is_public: Option<bool>,
}

/// Everything the editor needs in one response: the kit and its ordered
/// sections, each with its ordered assets or team members.
#[derive(Debug, Clone, Serialize)]
pub struct KitTree {
    #[serde(flatten)]
    pub kit: Kit,
    pub sections: Vec<SectionTree>,
}
