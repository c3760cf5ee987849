//! Slug generation for public kit and brand URLs.

use crate::validation::{SLUG_MAX_LEN, SLUG_MIN_LEN};

/// Fallback used when a name contains nothing slug-worthy.
const FALLBACK: &str = "kit";

/// Turn a display name into a URL slug.
///
/// Lowercases ASCII letters, collapses every run of other characters into a
/// single hyphen and trims hyphens from both ends. The result is cut to
/// [`SLUG_MAX_LEN`] and padded with the fallback when too short.
///
/// ```
/// use kittie_core::slug::slugify;
///
/// assert_eq!(slugify("Acme Brand Kit"), "acme-brand-kit");
/// assert_eq!(slugify("  Hello,   World!! "), "hello-world");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.len() < SLUG_MIN_LEN {
        if slug.is_empty() {
            return FALLBACK.to_string();
        }
        slug = format!("{slug}-{FALLBACK}");
    }

    slug
}

/// The `n`th candidate for a slug whose base form may already be taken.
///
/// `n == 1` is the base itself; later candidates append `-n`, shortening the
/// base so the result still fits in [`SLUG_MAX_LEN`].
pub fn slug_candidate(base: &str, n: u32) -> String {
    if n <= 1 {
        return base.to_string();
    }
    let suffix = format!("-{n}");
    let keep = SLUG_MAX_LEN.saturating_sub(suffix.len()).min(base.len());
    let trimmed = base[..keep].trim_end_matches('-');
    format!("{trimmed}{suffix}")
}
