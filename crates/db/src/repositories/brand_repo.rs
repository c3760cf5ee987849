//! Repository for the `brands` table.

use kittie_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::brand::{Brand, CreateBrand, UpdateBrand};

const COLUMNS: &str = "id, user_id, name, slug, website, primary_color, secondary_color, \
                       description, created_at, updated_at";

/// Provides owner-scoped CRUD operations for brands.
pub struct BrandRepo;

impl BrandRepo {
    /// Insert a new brand with an already-resolved unique `slug`.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        slug: &str,
        input: &CreateBrand,
    ) -> Result<Brand, sqlx::Error> {
        let query = format!(
            "INSERT INTO brands (user_id, name, slug, website, primary_color, secondary_color, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(user_id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(&input.website)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List the user's brands, alphabetically.
    pub async fn list(pool: &PgPool, user_id: UserId) -> Result<Vec<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE user_id = $1 ORDER BY name, id");
        sqlx::query_as::<_, Brand>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find by id regardless of owner. Used to attach brand details to a
    /// public kit.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE id = $1");
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a brand. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the brand does not exist or belongs to someone else.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
        input: &UpdateBrand,
    ) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!(
            "UPDATE brands SET
                name = COALESCE($3, name),
                slug = COALESCE($4, slug),
                website = COALESCE($5, website),
                primary_color = COALESCE($6, primary_color),
                secondary_color = COALESCE($7, secondary_color),
                description = COALESCE($8, description)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.website)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a brand. Kits that referenced it keep existing without a brand.
    pub async fn delete_owned(pool: &PgPool, id: DbId, user_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
