//! Team member entity model and DTOs.

use kittie_core::types::{DbId, Timestamp};
use kittie_core::validation::validate_name;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `team_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub id: DbId,
    pub section_id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    #[serde(skip_serializing)]
    pub photo_storage_path: Option<String>,
    #[serde(skip_serializing)]
    pub photo_size_bytes: i64,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a team member. New members are appended last.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeamMember {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 120))]
    pub role: Option<String>,
    #[validate(length(max = 4000))]
    pub bio: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// DTO for updating a team member. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTeamMember {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub role: Option<String>,
    #[validate(length(max = 4000))]
    pub bio: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}
