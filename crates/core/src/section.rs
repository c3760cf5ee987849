//! Section kinds and what each kind may contain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind of a kit section, stored as lowercase text in `sections.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    Logos,
    Gallery,
    Documents,
    Team,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Logos => "logos",
            SectionKind::Gallery => "gallery",
            SectionKind::Documents => "documents",
            SectionKind::Team => "team",
        }
    }

    pub fn accepts_assets(self) -> bool {
        !matches!(self, SectionKind::Team)
    }

    pub fn accepts_team_members(self) -> bool {
        matches!(self, SectionKind::Team)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SectionKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for SectionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(SectionKind::Hero),
            "logos" => Ok(SectionKind::Logos),
            "gallery" => Ok(SectionKind::Gallery),
            "documents" => Ok(SectionKind::Documents),
            "team" => Ok(SectionKind::Team),
            other => Err(CoreError::Validation(format!(
                "Unknown section kind '{other}'. Must be one of: hero, logos, gallery, documents, team"
            ))),
        }
    }
}

/// Sections every new kit starts with, in display order.
pub const DEFAULT_SECTIONS: [(SectionKind, &str); 4] = [
    (SectionKind::Hero, "Welcome"),
    (SectionKind::Logos, "Logos"),
    (SectionKind::Gallery, "Gallery"),
    (SectionKind::Team, "Team"),
];

/// Reject content that does not belong in a section of `kind`.
pub fn ensure_accepts_assets(kind: SectionKind) -> Result<(), CoreError> {
    if kind.accepts_assets() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "A {kind} section holds team members, not files"
        )))
    }
}

pub fn ensure_accepts_team_members(kind: SectionKind) -> Result<(), CoreError> {
    if kind.accepts_team_members() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Team members can only be added to a team section, not a {kind} section"
        )))
    }
}
