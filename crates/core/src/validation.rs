//! Field validators shared by the request DTOs.
//!
//! Each function has the signature expected by `validator`'s
//! `#[validate(custom(function = ...))]` attribute, so DTOs can derive
//! [`validator::Validate`] and call these directly.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// Minimum length of kit, brand and team member names (after trimming).
pub const NAME_MIN_LEN: usize = 2;
/// Maximum length of names and section titles.
pub const NAME_MAX_LEN: usize = 80;
/// Minimum slug length.
pub const SLUG_MIN_LEN: usize = 3;
/// Maximum slug length.
pub const SLUG_MAX_LEN: usize = 60;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Names must have 2 to 80 characters once surrounding whitespace is removed.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < NAME_MIN_LEN {
        return Err(error(
            "name_too_short",
            format!("Must be at least {NAME_MIN_LEN} characters"),
        ));
    }
    if len > NAME_MAX_LEN {
        return Err(error(
            "name_too_long",
            format!("Must be at most {NAME_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

/// Section titles may be a single character but never blank.
pub fn validate_title(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(error("title_blank", "Title must not be blank".into()));
    }
    if len > NAME_MAX_LEN {
        return Err(error(
            "title_too_long",
            format!("Must be at most {NAME_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

/// Colors are `#RGB` or `#RRGGBB` hex.
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    if HEX_COLOR.is_match(value) {
        Ok(())
    } else {
        Err(error(
            "invalid_color",
            format!("Invalid color '{value}'. Must be in #RGB or #RRGGBB hex format"),
        ))
    }
}

/// Slugs are lowercase alphanumerics separated by single hyphens.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    let len = value.len();
    if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) {
        return Err(error(
            "invalid_slug_length",
            format!("Slug must be {SLUG_MIN_LEN} to {SLUG_MAX_LEN} characters"),
        ));
    }
    if !SLUG.is_match(value) {
        return Err(error(
            "invalid_slug",
            "Slug may only contain lowercase letters, digits and single hyphens".into(),
        ));
    }
    Ok(())
}

/// Website links must be absolute http(s) URLs.
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err(error(
            "invalid_url",
            "Must be an absolute http:// or https:// URL".into(),
        )),
    }
}

/// Flatten `validator` output into `field -> messages`, for the JSON error body.
pub fn field_messages(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .errors()
        .iter()
        .filter_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => Some((
                field.to_string(),
                list.iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect(),
            )),
            _ => None,
        })
        .collect()
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = field_messages(&errors).into_iter().collect();
        fields.sort();
        let summary = fields
            .iter()
            .map(|(field, msgs)| format!("{field}: {}", msgs.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        CoreError::Validation(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_rejected() {
        assert!(validate_name("A").is_err());
        assert!(validate_name("  A  ").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("Ab").is_ok());
    }

    #[test]
    fn long_names_rejected() {
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN)).is_ok());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn blank_title_rejected() {
        assert!(validate_title("   ").is_err());
        assert!(validate_title("Q").is_ok());
    }

    #[test]
    fn valid_hex_colors_accepted() {
        for c in ["#fff", "#FFF", "#1a2B3c", "#000000"] {
            assert!(validate_hex_color(c).is_ok(), "{c} should be valid");
        }
    }

    #[test]
    fn malformed_colors_rejected() {
        for c in ["fff", "#ffff", "#12345g", "red", "#1234567", ""] {
            assert!(validate_hex_color(c).is_err(), "{c} should be rejected");
        }
    }

    #[test]
    fn slugs() {
        assert!(validate_slug("acme-brand-kit").is_ok());
        assert!(validate_slug("ab").is_err());
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug("acme--kit").is_err());
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("acme_kit").is_err());
    }

    #[test]
    fn urls() {
        assert!(validate_http_url("https://acme.io").is_ok());
        assert!(validate_http_url("http://acme.io/about").is_ok());
        assert!(validate_http_url("acme.io").is_err());
        assert!(validate_http_url("https://").is_err());
        assert!(validate_http_url("ftp://acme.io").is_err());
    }

    #[test]
    fn validation_errors_convert_to_core_error() {
        let mut errors = ValidationErrors::new();
        errors.add("name", error("name_too_short", "too short".into()));
        let core: CoreError = errors.into();
        assert_eq!(core.to_string(), "Validation failed: name: too short");
    }
}
