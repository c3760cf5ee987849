//! Handlers for kit sections.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kittie_core::error::CoreError;
use kittie_core::types::{DbId, UserId};
use kittie_db::models::section::{CreateSection, Section, UpdateSection};
use kittie_db::repositories::SectionRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::kit::owned_kit;
use crate::handlers::{remove_objects, ReorderRequest};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Section",
        id,
    })
}

/// Load a section whose kit is owned by `user_id`, or 404.
pub async fn owned_section(state: &AppState, id: DbId, user_id: UserId) -> AppResult<Section> {
    SectionRepo::find_owned(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/kits/{kit_id}/sections
pub async fn list_by_kit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kit_id): Path<DbId>,
) -> AppResult<Json<Vec<Section>>> {
    owned_kit(&state, kit_id, user.user_id).await?;
    let sections = SectionRepo::list_for_kit(&state.pool, kit_id).await?;
    Ok(Json(sections))
}

/// POST /api/v1/kits/{kit_id}/sections
///
/// Appends the section after the kit's last one. A second hero is a 409.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kit_id): Path<DbId>,
    Json(input): Json<CreateSection>,
) -> AppResult<(StatusCode, Json<Section>)> {
    input.validate()?;
    owned_kit(&state, kit_id, user.user_id).await?;
    let section = SectionRepo::create(&state.pool, kit_id, &input).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// PUT /api/v1/kits/{kit_id}/sections/order
pub async fn reorder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kit_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<Vec<Section>>> {
    owned_kit(&state, kit_id, user.user_id).await?;
    let sections = SectionRepo::reorder(&state.pool, kit_id, &input.ids).await?;
    Ok(Json(sections))
}

/// PATCH /api/v1/sections/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSection>,
) -> AppResult<Json<Section>> {
    input.validate()?;
    let section = SectionRepo::update_owned(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(section))
}

/// DELETE /api/v1/sections/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let paths = SectionRepo::delete_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    remove_objects(&state, &paths).await;
    Ok(StatusCode::NO_CONTENT)
}
