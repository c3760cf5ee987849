//! Handlers for team bios in `team` sections.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use kittie_core::error::CoreError;
use kittie_core::plan::ensure_upload_fits;
use kittie_core::section::ensure_accepts_team_members;
use kittie_core::types::DbId;
use kittie_core::upload::{resolve_photo_mime, storage_path};
use kittie_db::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};
use kittie_db::repositories::{ProfileRepo, SectionRepo, TeamMemberRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::section::owned_section;
use crate::handlers::{read_upload, remove_objects, ReorderRequest};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "TeamMember",
        id,
    })
}

/// GET /api/v1/sections/{section_id}/team
pub async fn list_by_section(
    State(state): State<AppState>,
    user: AuthUser,
    Path(section_id): Path<DbId>,
) -> AppResult<Json<Vec<TeamMember>>> {
    owned_section(&state, section_id, user.user_id).await?;
    let members = TeamMemberRepo::list_for_section(&state.pool, section_id).await?;
    Ok(Json(members))
}

/// POST /api/v1/sections/{section_id}/team
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(section_id): Path<DbId>,
    Json(input): Json<CreateTeamMember>,
) -> AppResult<(StatusCode, Json<TeamMember>)> {
    input.validate()?;
    let section = owned_section(&state, section_id, user.user_id).await?;
    ensure_accepts_team_members(section.kind)?;

    let member = TeamMemberRepo::create(&state.pool, section_id, &input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// PUT /api/v1/sections/{section_id}/team/order
pub async fn reorder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(section_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<Vec<TeamMember>>> {
    owned_section(&state, section_id, user.user_id).await?;
    let members = TeamMemberRepo::reorder(&state.pool, section_id, &input.ids).await?;
    Ok(Json(members))
}

/// PATCH /api/v1/team/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTeamMember>,
) -> AppResult<Json<TeamMember>> {
    input.validate()?;
    let member = TeamMemberRepo::update_owned(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(member))
}

/// POST /api/v1/team/{id}/photo
///
/// Multipart form with a required image `file`. Portraits count toward the
/// plan's storage limit. Replaces any previous portrait, whose object is
/// then removed.
pub async fn upload_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<TeamMember>> {
    let member = TeamMemberRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let section = SectionRepo::find_owned(&state.pool, member.section_id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let upload = read_upload(multipart).await?;
    let mime = resolve_photo_mime(&upload.filename, upload.content_type.as_deref())?;

    // The portrait being replaced does not count toward the new total.
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;
    let usage = ProfileRepo::usage(&state.pool, user.user_id).await?;
    let size = upload.bytes.len();
    ensure_upload_fits(
        profile.plan,
        size as u64,
        (usage.storage_bytes - member.photo_size_bytes).max(0) as u64,
    )?;

    let path = storage_path(user.user_id, section.kit_id, mime);
    state.storage.put(&path, upload.bytes, mime).await?;
    let url = state.storage.public_url(&path);

    let updated = match TeamMemberRepo::set_photo(
        &state.pool,
        id,
        user.user_id,
        &url,
        &path,
        size as i64,
    )
    .await
    {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            remove_objects(&state, &[path]).await;
            return Err(not_found(id));
        }
        Err(e) => {
            remove_objects(&state, &[path]).await;
            return Err(e.into());
        }
    };

    if let Some(previous) = member.photo_storage_path {
        remove_objects(&state, &[previous]).await;
    }

    tracing::info!(team_member_id = id, mime_type = mime, "Team photo uploaded");
    Ok(Json(updated))
}

/// DELETE /api/v1/team/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let photo = TeamMemberRepo::delete_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(path) = photo {
        remove_objects(&state, &[path]).await;
    }
    Ok(StatusCode::NO_CONTENT)
}
