//! Unauthenticated endpoints serving published kits: JSON for the embed
//! script, a standalone HTML page, the iframe document and the script itself.

use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use kittie_core::public_kit::PublicKit;
use kittie_core::render::{render_kit_html, RenderMode};
use kittie_core::types::DbId;
use kittie_db::repositories::PublicKitRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Embed script source. `__KITTIE_BASE_URL__` is replaced at serve time.
const EMBED_JS: &str = include_str!("../../static/embed.js");
const BASE_URL_PLACEHOLDER: &str = "__KITTIE_BASE_URL__";

/// Published kits change rarely; let browsers and CDNs hold them briefly.
const PUBLIC_CACHE_CONTROL: &str = "public, max-age=60";

/// GET /api/v1/public/kits/{id_or_slug}
///
/// Unpublished and missing kits are both 404.
pub async fn kit_json(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Response> {
    let kit = PublicKitRepo::load(&state.pool, &key)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;

    let mut response = Json(kit).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(PUBLIC_CACHE_CONTROL),
    );
    Ok(response)
}

/// GET /k/{slug}
pub async fn kit_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let kit = PublicKitRepo::load_by_slug(&state.pool, &slug).await?;
    Ok(html_response(kit.as_ref(), RenderMode::Page))
}

/// GET /embed/{id}
///
/// Document loaded in the iframe opened by `Kittie.open`. Any site may
/// frame it.
pub async fn embed_frame(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let kit = PublicKitRepo::load_by_id(&state.pool, id).await?;
    let mut response = html_response(kit.as_ref(), RenderMode::Embed);
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("frame-ancestors *"),
    );
    Ok(response)
}

/// GET /embed.js
pub async fn embed_script(State(state): State<AppState>) -> Response {
    let script = EMBED_JS.replace(BASE_URL_PLACEHOLDER, &state.config.public_base_url);
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=300"),
        ],
        script,
    )
        .into_response()
}

fn html_response(kit: Option<&PublicKit>, mode: RenderMode) -> Response {
    match kit {
        Some(kit) => {
            let mut response = Html(render_kit_html(kit, mode)).into_response();
            response.headers_mut().insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static(PUBLIC_CACHE_CONTROL),
            );
            response
        }
        None => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
    }
}

const NOT_FOUND_PAGE: &str = "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Kit not found</title></head><body><main class=\"kittie-missing\"><h1>Kit not found</h1>\
<p>This kit does not exist or is not published.</p></main></body></html>\n";
