//! Upload rules: accepted file types per section and object naming.

use crate::error::CoreError;
use crate::section::SectionKind;
use crate::types::{DbId, UserId};
use crate::validation::NAME_MAX_LEN;

const IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Map a file extension (without the dot, any case) to its MIME type.
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

/// Canonical extension for a MIME type, used when naming stored objects.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let ext = match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        "application/zip" => "zip",
        _ => return None,
    };
    Some(ext)
}

/// The extension of `filename`, if it has one.
pub fn file_extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

/// MIME types a section of `kind` will store.
pub fn allowed_mime_types(kind: SectionKind) -> &'static [&'static str] {
    match kind {
        SectionKind::Hero => IMAGE_TYPES,
        SectionKind::Logos => &["image/png", "image/jpeg", "image/webp", "image/svg+xml"],
        SectionKind::Gallery => &["image/png", "image/jpeg", "image/webp", "image/gif"],
        SectionKind::Documents => &[
            "application/pdf",
            "application/zip",
            "image/png",
            "image/jpeg",
            "image/webp",
            "image/svg+xml",
        ],
        SectionKind::Team => &[],
    }
}

/// Resolve the MIME type of an uploaded part and check the section takes it.
///
/// The declared content type wins unless it is missing or the generic
/// `application/octet-stream`, in which case the filename extension decides.
pub fn resolve_mime(
    kind: SectionKind,
    filename: &str,
    declared: Option<&str>,
) -> Result<&'static str, CoreError> {
    let from_declared = declared
        .filter(|d| *d != "application/octet-stream")
        .and_then(|d| {
            let essence = d.split(';').next().unwrap_or(d).trim();
            mime_from_extension(extension_for_mime(essence)?)
        });

    let mime = from_declared
        .or_else(|| file_extension(filename).and_then(mime_from_extension))
        .ok_or_else(|| {
            CoreError::Validation(format!("Unsupported file type for '{filename}'"))
        })?;

    ensure_type_allowed(kind, mime)?;
    Ok(mime)
}

/// Check that a section of `kind` takes files of type `mime`. Applies to
/// new uploads and to assets moved in from another section.
pub fn ensure_type_allowed(kind: SectionKind, mime: &str) -> Result<(), CoreError> {
    if allowed_mime_types(kind).contains(&mime) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{mime} files cannot be added to a {kind} section"
        )))
    }
}

/// Team member portraits accept the same types as the hero image.
pub fn resolve_photo_mime(filename: &str, declared: Option<&str>) -> Result<&'static str, CoreError> {
    resolve_mime(SectionKind::Hero, filename, declared)
}

/// Object key for an uploaded file: `{user}/{kit}/{uuid}.{ext}`.
///
/// Scoping by user keeps storage policies simple; the random name avoids
/// collisions and stops callers guessing other objects' URLs.
pub fn storage_path(user_id: UserId, kit_id: DbId, mime: &str) -> String {
    let ext = extension_for_mime(mime).unwrap_or("bin");
    format!("{user_id}/{kit_id}/{}.{ext}", uuid::Uuid::new_v4())
}

/// Default display name for an asset: the filename without its extension,
/// cut to at most [`NAME_MAX_LEN`] characters.
pub fn display_name(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = match file_extension(base) {
        Some(ext) => &base[..base.len() - ext.len() - 1],
        None => base,
    };
    let trimmed = stem.trim();
    if trimmed.is_empty() {
        return "Untitled".to_string();
    }
    let cut: String = trimmed.chars().take(NAME_MAX_LEN).collect();
    cut.trim_end().to_string()
}
