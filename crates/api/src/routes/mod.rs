pub mod asset;
pub mod billing;
pub mod brand;
pub mod health;
pub mod kit;
pub mod public;
pub mod section;
pub mod team;

use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Build the authenticated `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /me                                   current profile (created on first access)
///
/// /billing                              plan, limits, usage
/// /billing/webhook                      billing provider webhook (signed, no auth)
///
/// /brands                               list, create
/// /brands/{id}                          get, update, delete
///
/// /kits                                 list, create (plan quota)
/// /kits/{id}                            get, update, delete
/// /kits/{id}/editor                     full editor tree
/// /kits/{kit_id}/sections               list, create
/// /kits/{kit_id}/sections/order         reorder (PUT)
///
/// /sections/{id}                        update, delete
/// /sections/{id}/assets                 list, upload (multipart)
/// /sections/{id}/assets/order           reorder (PUT)
/// /sections/{id}/team                   list, create
/// /sections/{id}/team/order             reorder (PUT)
///
/// /assets/{id}                          update (incl. move), delete
///
/// /team/{id}                            update, delete
/// /team/{id}/photo                      upload portrait (multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(profile::me))
        .nest("/billing", billing::router())
        .nest("/brands", brand::router())
        .nest("/kits", kit::router())
        .nest("/sections", section::router())
        .nest("/assets", asset::router())
        .nest("/team", team::router())
}
