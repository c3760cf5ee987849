//! Server-side HTML rendering of a published kit.
//!
//! Used for the standalone public page (`/k/{slug}`) and for the document
//! loaded inside the embed iframe (`/embed/{id}`). Every piece of user text
//! passes through [`escape_html`].

use std::fmt::Write;

use crate::public_kit::{PublicAsset, PublicKit, PublicSection, PublicTeamMember};
use crate::section::SectionKind;

/// Accent used when neither the kit nor its brand sets one.
pub const DEFAULT_ACCENT: &str = "#6d28d9";

/// Where the rendered document will be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Standalone page with full `<head>` metadata.
    Page,
    /// Iframe document; links open in a new tab so the host page stays put.
    Embed,
}

/// Escape `&`, `<`, `>`, `"` and `'` for use in element text and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Human readable byte size (`532 B`, `1.5 KB`, `12.0 MB`).
pub fn human_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn accent(kit: &PublicKit) -> &str {
    kit.accent_color
        .as_deref()
        .or_else(|| kit.brand.as_ref().and_then(|b| b.primary_color.as_deref()))
        .unwrap_or(DEFAULT_ACCENT)
}

/// Render `kit` as a complete HTML document.
pub fn render_kit_html(kit: &PublicKit, mode: RenderMode) -> String {
    let title = escape_html(&kit.name);
    let mut html = String::with_capacity(4096);

    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{title}</title>");

    match mode {
        RenderMode::Page => {
            let _ = writeln!(html, "<meta property=\"og:title\" content=\"{title}\">");
            if let Some(desc) = non_empty(&kit.description) {
                let desc = escape_html(desc);
                let _ = writeln!(html, "<meta name=\"description\" content=\"{desc}\">");
                let _ = writeln!(html, "<meta property=\"og:description\" content=\"{desc}\">");
            }
            if let Some(image) = hero_image(kit) {
                let _ = writeln!(
                    html,
                    "<meta property=\"og:image\" content=\"{}\">",
                    escape_html(&image.url)
                );
            }
        }
        RenderMode::Embed => {
            html.push_str("<base target=\"_blank\">\n");
        }
    }

    let _ = writeln!(
        html,
        "<style>:root{{--kittie-accent:{}}}</style>",
        escape_html(accent(kit))
    );
    html.push_str("</head>\n");

    let mode_class = match mode {
        RenderMode::Page => "kittie-page",
        RenderMode::Embed => "kittie-embed",
    };
    let _ = writeln!(html, "<body class=\"{mode_class}\">");
    let _ = writeln!(
        html,
        "<main class=\"kittie-kit\" data-kit-id=\"{}\">",
        kit.id
    );

    if !kit.sections.iter().any(|s| s.kind == SectionKind::Hero) {
        let _ = writeln!(html, "<header class=\"kittie-hero\"><h1>{title}</h1></header>");
    }

    for section in &kit.sections {
        render_section(&mut html, kit, section);
    }

    if kit.show_branding {
        html.push_str(
            "<footer class=\"kittie-branding\"><a href=\"https://kittie.app\">Made with Kittie</a></footer>\n",
        );
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

/// Blanked text fields are stored as empty strings; treat them as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn hero_image(kit: &PublicKit) -> Option<&PublicAsset> {
    kit.sections
        .iter()
        .filter(|s| s.kind == SectionKind::Hero)
        .flat_map(|s| s.assets.iter())
        .find(|a| a.is_image())
}

fn render_section(html: &mut String, kit: &PublicKit, section: &PublicSection) {
    if section.kind == SectionKind::Hero {
        let _ = writeln!(html, "<header class=\"kittie-hero\" id=\"section-{}\">", section.id);
        if let Some(image) = section.assets.iter().find(|a| a.is_image()) {
            let _ = writeln!(
                html,
                "<img class=\"kittie-hero-image\" src=\"{}\" alt=\"{}\">",
                escape_html(&image.url),
                escape_html(&image.name)
            );
        }
        let _ = writeln!(html, "<h1>{}</h1>", escape_html(&kit.name));
        if section.title != kit.name {
            let _ = writeln!(html, "<h2>{}</h2>", escape_html(&section.title));
        }
        if let Some(desc) = non_empty(&section.description).or(non_empty(&kit.description)) {
            let _ = writeln!(html, "<p>{}</p>", escape_html(desc));
        }
        html.push_str("</header>\n");
        return;
    }

    if section.assets.is_empty() && section.team.is_empty() {
        return;
    }

    let _ = writeln!(
        html,
        "<section class=\"kittie-section kittie-{}\" id=\"section-{}\">",
        section.kind, section.id
    );
    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&section.title));
    if let Some(desc) = non_empty(&section.description) {
        let _ = writeln!(html, "<p>{}</p>", escape_html(desc));
    }

    match section.kind {
        SectionKind::Team => {
            html.push_str("<ul class=\"kittie-team\">\n");
            for member in &section.team {
                render_member(html, member);
            }
            html.push_str("</ul>\n");
        }
        _ => {
            html.push_str("<ul class=\"kittie-assets\">\n");
            for asset in &section.assets {
                render_asset(html, asset);
            }
            html.push_str("</ul>\n");
        }
    }

    html.push_str("</section>\n");
}

fn render_asset(html: &mut String, asset: &PublicAsset) {
    let url = escape_html(&asset.url);
    let name = escape_html(&asset.name);
    html.push_str("<li class=\"kittie-asset\">");
    if asset.is_image() {
        let _ = write!(html, "<img src=\"{url}\" alt=\"{name}\" loading=\"lazy\">");
    }
    let _ = write!(
        html,
        "<a href=\"{url}\" download>{name}</a> <small>{}</small>",
        human_size(asset.size_bytes)
    );
    html.push_str("</li>\n");
}

fn render_member(html: &mut String, member: &PublicTeamMember) {
    let name = escape_html(&member.name);
    html.push_str("<li class=\"kittie-member\">");
    if let Some(photo) = &member.photo_url {
        let _ = write!(html, "<img src=\"{}\" alt=\"{name}\" loading=\"lazy\">", escape_html(photo));
    }
    let _ = write!(html, "<strong>{name}</strong>");
    if let Some(role) = &member.role {
        let _ = write!(html, " <span>{}</span>", escape_html(role));
    }
    if let Some(bio) = &member.bio {
        let _ = write!(html, "<p>{}</p>", escape_html(bio));
    }
    if let Some(email) = &member.email {
        let email = escape_html(email);
        let _ = write!(html, "<a href=\"mailto:{email}\">{email}</a>");
    }
    html.push_str("</li>\n");
}
