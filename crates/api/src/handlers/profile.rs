//! Handlers for the signed-in user's profile.

use axum::extract::State;
use axum::Json;
use kittie_db::models::profile::Profile;
use kittie_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/me
///
/// Creates the profile on first access.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Profile>> {
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;
    Ok(Json(profile))
}
