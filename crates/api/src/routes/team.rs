//! Route definitions for the `/team` resource.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::team;
use crate::state::AppState;

/// Routes mounted at `/team`.
///
/// ```text
/// PATCH  /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/photo    -> upload_photo (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", patch(team::update).delete(team::delete))
        .route("/{id}/photo", post(team::upload_photo))
}
