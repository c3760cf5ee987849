//! Route definitions for the `/kits` resource.
//!
//! Also nests the kit's section routes under `/kits/{kit_id}/sections`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{kit, section};
use crate::state::AppState;

/// Routes mounted at `/kits`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PATCH  /{id}                          -> update
/// DELETE /{id}                          -> delete
/// GET    /{id}/editor                   -> editor
///
/// GET    /{kit_id}/sections             -> list_by_kit
/// POST   /{kit_id}/sections             -> create
/// PUT    /{kit_id}/sections/order       -> reorder
/// ```
pub fn router() -> Router<AppState> {
    let section_routes = Router::new()
        .route("/", get(section::list_by_kit).post(section::create))
        .route("/order", put(section::reorder));

    Router::new()
        .route("/", get(kit::list).post(kit::create))
        .route(
            "/{id}",
            get(kit::get_by_id).patch(kit::update).delete(kit::delete),
        )
        .route("/{id}/editor", get(kit::editor))
        .nest("/{kit_id}/sections", section_routes)
}
