//! Handlers for the `/kits` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kittie_core::error::CoreError;
use kittie_core::slug::slugify;
use kittie_core::types::{DbId, UserId};
use kittie_db::models::kit::{CreateKit, Kit, KitTree, UpdateKit};
use kittie_db::repositories::slug::first_free_slug;
use kittie_db::repositories::{BrandRepo, KitRepo, ProfileRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::remove_objects;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Kit", id })
}

/// Load a kit owned by `user_id`, or 404.
pub async fn owned_kit(state: &AppState, id: DbId, user_id: UserId) -> AppResult<Kit> {
    KitRepo::find_owned(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/kits
///
/// Fails with 402 when the plan's kit quota is used up.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateKit>,
) -> AppResult<(StatusCode, Json<Kit>)> {
    input.validate()?;
    ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;

    let slug = match &input.slug {
        Some(slug) => slug.clone(),
        None => first_free_slug(&state.pool, "kits", &slugify(&input.name)).await?,
    };
    let kit = KitRepo::create_with_quota(&state.pool, user.user_id, &slug, &input).await?;

    tracing::info!(kit_id = kit.id, user_id = %user.user_id, slug = %kit.slug, "Kit created");
    Ok((StatusCode::CREATED, Json(kit)))
}

/// GET /api/v1/kits
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Kit>>> {
    let kits = KitRepo::list(&state.pool, user.user_id).await?;
    Ok(Json(kits))
}

/// GET /api/v1/kits/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Kit>> {
    Ok(Json(owned_kit(&state, id, user.user_id).await?))
}

/// GET /api/v1/kits/{id}/editor
///
/// The kit with its ordered sections, each with ordered assets and team.
pub async fn editor(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<KitTree>> {
    let kit = owned_kit(&state, id, user.user_id).await?;
    let tree = KitRepo::tree(&state.pool, kit).await?;
    Ok(Json(tree))
}

/// PATCH /api/v1/kits/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateKit>,
) -> AppResult<Json<Kit>> {
    input.validate()?;
    if let Some(brand_id) = input.brand_id {
        BrandRepo::find_owned(&state.pool, brand_id, user.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Brand",
                id: brand_id,
            }))?;
    }

    let kit = KitRepo::update_owned(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(is_public) = input.is_public {
        tracing::info!(kit_id = id, is_public, "Kit visibility changed");
    }
    Ok(Json(kit))
}

/// DELETE /api/v1/kits/{id}
///
/// Removes the kit's files from storage once the rows are gone.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let paths = KitRepo::delete_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    remove_objects(&state, &paths).await;

    tracing::info!(kit_id = id, user_id = %user.user_id, files = paths.len(), "Kit deleted");
    Ok(StatusCode::NO_CONTENT)
}
