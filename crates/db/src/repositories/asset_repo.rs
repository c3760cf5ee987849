//! Repository for the `assets` table.

use kittie_core::plan::ensure_upload_fits;
use kittie_core::types::{DbId, UserId};
use sqlx::{PgExecutor, PgPool};

use crate::error::RepoError;
use crate::models::asset::{Asset, CreateAsset, UpdateAsset};
use crate::repositories::ordering::{self, ASSETS};
use crate::repositories::ProfileRepo;

const COLUMNS: &str = "a.id, a.section_id, a.name, a.description, a.storage_path, a.public_url, \
                       a.mime_type, a.size_bytes, a.order_index, a.created_at, a.updated_at";

/// Provides CRUD and ordering for uploaded files. Ownership is resolved
/// through section -> kit.
pub struct AssetRepo;

impl AssetRepo {
    /// Append an asset to the end of its section.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets AS a
                (section_id, name, description, storage_path, public_url, mime_type, size_bytes, order_index)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     (SELECT COALESCE(MAX(order_index) + 1, 0) FROM assets WHERE section_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.section_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.storage_path)
            .bind(&input.public_url)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .fetch_one(executor)
            .await
    }

    /// Append an asset after re-checking the owner's storage quota with
    /// their profile row locked, so concurrent uploads cannot overshoot it.
    pub async fn create_within_quota(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateAsset,
    ) -> Result<Asset, RepoError> {
        let mut tx = pool.begin().await?;

        let plan = ProfileRepo::lock_plan(&mut tx, user_id).await?;
        let used = ProfileRepo::storage_bytes(&mut *tx, user_id).await?;
        ensure_upload_fits(plan, input.size_bytes.max(0) as u64, used.max(0) as u64)?;

        let asset = Self::create(&mut *tx, input).await?;
        tx.commit().await?;
        Ok(asset)
    }

    /// List a section's assets in display order.
    pub async fn list_for_section(
        pool: &PgPool,
        section_id: DbId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets a WHERE a.section_id = $1 ORDER BY a.order_index, a.id"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(section_id)
            .fetch_all(pool)
            .await
    }

    /// Every asset of a kit, ordered by section then position.
    pub async fn list_for_kit(pool: &PgPool, kit_id: DbId) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets a
               JOIN sections s ON s.id = a.section_id
              WHERE s.kit_id = $1
              ORDER BY s.order_index, s.id, a.order_index, a.id"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(kit_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets a
               JOIN sections s ON s.id = a.section_id
               JOIN kits k ON k.id = s.kit_id
              WHERE a.id = $1 AND k.user_id = $2"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update an asset's metadata, optionally moving it to another section.
    ///
    /// A moved asset is appended after the target section's last asset. The
    /// caller must check the target section belongs to the same user.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets a SET
                name = COALESCE($3, a.name),
                description = COALESCE($4, a.description),
                section_id = COALESCE($5, a.section_id),
                order_index = CASE
                    WHEN $5::BIGINT IS NOT NULL AND $5 <> a.section_id THEN
                        (SELECT COALESCE(MAX(x.order_index) + 1, 0) FROM assets x WHERE x.section_id = $5)
                    ELSE a.order_index
                END
               FROM sections s
               JOIN kits k ON k.id = s.kit_id
              WHERE a.id = $1 AND s.id = a.section_id AND k.user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.section_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset, returning its storage path if an owned row matched.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "DELETE FROM assets a USING sections s, kits k
              WHERE a.id = $1 AND s.id = a.section_id AND k.id = s.kit_id AND k.user_id = $2
             RETURNING a.storage_path",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Persist a new asset order for a section and return the reordered list.
    pub async fn reorder(
        pool: &PgPool,
        section_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<Asset>, RepoError> {
        let mut tx = pool.begin().await?;
        ordering::reorder_children(&mut tx, ASSETS, section_id, ids).await?;
        tx.commit().await?;
        Ok(Self::list_for_section(pool, section_id).await?)
    }
}
