//! Handlers for uploaded section assets.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use kittie_core::error::CoreError;
use kittie_core::plan::ensure_upload_fits;
use kittie_core::section::ensure_accepts_assets;
use kittie_core::types::DbId;
use kittie_core::upload::{display_name, ensure_type_allowed, resolve_mime, storage_path};
use kittie_core::validation::validate_title;
use kittie_db::models::asset::{Asset, CreateAsset, UpdateAsset};
use kittie_db::repositories::{AssetRepo, ProfileRepo};
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};
use crate::handlers::section::owned_section;
use crate::handlers::{read_upload, remove_objects, ReorderRequest};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Asset", id })
}

/// GET /api/v1/sections/{section_id}/assets
pub async fn list_by_section(
    State(state): State<AppState>,
    user: AuthUser,
    Path(section_id): Path<DbId>,
) -> AppResult<Json<Vec<Asset>>> {
    owned_section(&state, section_id, user.user_id).await?;
    let assets = AssetRepo::list_for_section(&state.pool, section_id).await?;
    Ok(Json(assets))
}

/// POST /api/v1/sections/{section_id}/assets
///
/// Multipart form with a required `file` and optional `name` and
/// `description`. The file type must suit the section and the file must fit
/// the plan's per-file and total storage limits. The asset is appended last.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    Path(section_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Asset>)> {
    let section = owned_section(&state, section_id, user.user_id).await?;
    ensure_accepts_assets(section.kind)?;

    let mut upload = read_upload(multipart).await?;
    let mime = resolve_mime(section.kind, &upload.filename, upload.content_type.as_deref())?;

    let name = match upload.fields.remove("name").map(|n| n.trim().to_string()) {
        Some(name) if !name.is_empty() => {
            if let Err(e) = validate_title(&name) {
                let mut errors = ValidationErrors::new();
                errors.add("name", e);
                return Err(errors.into());
            }
            name
        }
        _ => display_name(&upload.filename),
    };
    let description = upload
        .fields
        .remove("description")
        .filter(|d| !d.trim().is_empty());

    // Checked here to avoid storing a file that cannot be kept, and again
    // under the profile lock when the row is inserted.
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;
    let usage = ProfileRepo::usage(&state.pool, user.user_id).await?;
    let size = upload.bytes.len();
    ensure_upload_fits(profile.plan, size as u64, usage.storage_bytes.max(0) as u64)?;

    let path = storage_path(user.user_id, section.kit_id, mime);
    state.storage.put(&path, upload.bytes, mime).await?;

    let input = CreateAsset {
        section_id,
        name,
        description,
        public_url: state.storage.public_url(&path),
        storage_path: path.clone(),
        mime_type: mime.to_string(),
        size_bytes: size as i64,
    };
    let asset = match AssetRepo::create_within_quota(&state.pool, user.user_id, &input).await {
        Ok(asset) => asset,
        Err(e) => {
            remove_objects(&state, &[path]).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        asset_id = asset.id,
        section_id,
        mime_type = mime,
        size_bytes = size,
        "Asset uploaded"
    );
    Ok((StatusCode::CREATED, Json(asset)))
}

/// PUT /api/v1/sections/{section_id}/assets/order
pub async fn reorder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(section_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<Vec<Asset>>> {
    owned_section(&state, section_id, user.user_id).await?;
    let assets = AssetRepo::reorder(&state.pool, section_id, &input.ids).await?;
    Ok(Json(assets))
}

/// PATCH /api/v1/assets/{id}
///
/// Setting `section_id` moves the asset to the end of another section of
/// the same user that takes files of the asset's type.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<Json<Asset>> {
    input.validate()?;
    if let Some(target_id) = input.section_id {
        let asset = AssetRepo::find_owned(&state.pool, id, user.user_id)
            .await?
            .ok_or_else(|| not_found(id))?;
        let target = owned_section(&state, target_id, user.user_id).await?;
        ensure_accepts_assets(target.kind)?;
        ensure_type_allowed(target.kind, &asset.mime_type)?;
    }

    let asset = AssetRepo::update_owned(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(asset))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let path = AssetRepo::delete_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    remove_objects(&state, &[path]).await;
    Ok(StatusCode::NO_CONTENT)
}
