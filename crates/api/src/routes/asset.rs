//! Route definitions for the `/assets` resource.

use axum::routing::patch;
use axum::Router;

use crate::handlers::asset;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// PATCH  /{id}    -> update (may move to another section)
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", patch(asset::update).delete(asset::delete))
}
