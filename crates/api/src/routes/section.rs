//! Route definitions for the `/sections` resource and its children.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::{asset, section, team};
use crate::state::AppState;

/// Routes mounted at `/sections`.
///
/// ```text
/// PATCH  /{id}                  -> section::update
/// DELETE /{id}                  -> section::delete
///
/// GET    /{id}/assets           -> asset::list_by_section
/// POST   /{id}/assets           -> asset::upload (multipart)
/// PUT    /{id}/assets/order     -> asset::reorder
///
/// GET    /{id}/team             -> team::list_by_section
/// POST   /{id}/team             -> team::create
/// PUT    /{id}/team/order       -> team::reorder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", patch(section::update).delete(section::delete))
        .route(
            "/{id}/assets",
            get(asset::list_by_section).post(asset::upload),
        )
        .route("/{id}/assets/order", put(asset::reorder))
        .route("/{id}/team", get(team::list_by_section).post(team::create))
        .route("/{id}/team/order", put(team::reorder))
}
