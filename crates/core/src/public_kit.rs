//! The read-only shape of a published kit.
//!
//! Served as JSON to the embed script and rendered to HTML for the public
//! page and the embed iframe. Owner ids and storage paths never appear
//! here.

use serde::{Deserialize, Serialize};

use crate::section::SectionKind;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicKit {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub brand: Option<PublicBrand>,
    pub sections: Vec<PublicSection>,
    /// Whether the owner's plan requires the Kittie footer.
    pub show_branding: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicBrand {
    pub name: String,
    pub website: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicSection {
    pub id: DbId,
    pub kind: SectionKind,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<PublicAsset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team: Vec<PublicTeamMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicAsset {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

impl PublicAsset {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicTeamMember {
    pub id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}
