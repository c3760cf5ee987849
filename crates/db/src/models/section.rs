//! Section entity model and DTOs.

use kittie_core::section::SectionKind;
use kittie_core::types::{DbId, Timestamp};
use kittie_core::validation::validate_title;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::asset::Asset;
use crate::models::team_member::TeamMember;

/// A row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub kit_id: DbId,
    #[sqlx(try_from = "String")]
    pub kind: SectionKind,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a section to a kit. New sections are appended last.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSection {
    pub kind: SectionKind,
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// DTO for updating a section. The kind is fixed once created.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSection {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// A section with its children, as shown in the editor.
#[derive(Debug, Clone, Serialize)]
pub struct SectionTree {
    #[serde(flatten)]
    pub section: Section,
    pub assets: Vec<Asset>,
    pub team: Vec<TeamMember>,
}
