//! Route definitions for `/billing`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/billing`.
///
/// ```text
/// GET  /           -> summary
/// POST /webhook    -> webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(billing::summary))
        .route("/webhook", post(billing::webhook))
}
