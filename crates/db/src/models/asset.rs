//! Asset entity model and DTOs.

use kittie_core::types::{DbId, Timestamp};
use kittie_core::validation::validate_title;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub section_id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub storage_path: String,
    pub public_url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload assembled by the upload handler once the file is stored.
#[derive(Debug, Clone)]
pub struct CreateAsset {
    pub section_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub storage_path: String,
    pub public_url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

/// DTO for updating an asset. Setting `section_id` moves it to the end of
/// another section owned by the same user.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(custom(function = "validate_title"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub section_id: Option<DbId>,
}
