//! Routes anyone may call, from any origin.

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::public;
use crate::state::AppState;

/// Public kit JSON, pages and the embed script. Mounted at the root next to
/// the authenticated `/api/v1` tree, so it carries its own CORS policy.
///
/// ```text
/// GET /api/v1/public/kits/{id_or_slug}   -> kit_json
/// GET /k/{slug}                          -> kit_page
/// GET /embed/{id}                        -> embed_frame
/// GET /embed.js                          -> embed_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/public/kits/{key}", get(public::kit_json))
        .route("/k/{slug}", get(public::kit_page))
        .route("/embed/{id}", get(public::embed_frame))
        .route("/embed.js", get(public::embed_script))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
