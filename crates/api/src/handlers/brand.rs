//! Handlers for the `/brands` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kittie_core::error::CoreError;
use kittie_core::slug::slugify;
use kittie_core::types::DbId;
use kittie_db::models::brand::{Brand, CreateBrand, UpdateBrand};
use kittie_db::repositories::slug::first_free_slug;
use kittie_db::repositories::{BrandRepo, ProfileRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Brand", id })
}

/// POST /api/v1/brands
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBrand>,
) -> AppResult<(StatusCode, Json<Brand>)> {
    input.validate()?;
    ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;

    let slug = match &input.slug {
        Some(slug) => slug.clone(),
        None => first_free_slug(&state.pool, "brands", &slugify(&input.name)).await?,
    };
    let brand = BrandRepo::create(&state.pool, user.user_id, &slug, &input).await?;

    tracing::info!(brand_id = brand.id, user_id = %user.user_id, "Brand created");
    Ok((StatusCode::CREATED, Json(brand)))
}

/// GET /api/v1/brands
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Brand>>> {
    let brands = BrandRepo::list(&state.pool, user.user_id).await?;
    Ok(Json(brands))
}

/// GET /api/v1/brands/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Brand>> {
    let brand = BrandRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(brand))
}

/// PATCH /api/v1/brands/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBrand>,
) -> AppResult<Json<Brand>> {
    input.validate()?;
    let brand = BrandRepo::update_owned(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(brand))
}

/// DELETE /api/v1/brands/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if BrandRepo::delete_owned(&state.pool, id, user.user_id).await? {
        tracing::info!(brand_id = id, user_id = %user.user_id, "Brand deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
