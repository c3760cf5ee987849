//! Repository for the `sections` table.

use kittie_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::section::{CreateSection, Section, UpdateSection};
use crate::repositories::ordering::{self, SECTIONS};

const COLUMNS: &str =
    "s.id, s.kit_id, s.kind, s.title, s.description, s.order_index, s.created_at, s.updated_at";

/// Provides CRUD and ordering for kit sections. Ownership is resolved
/// through the parent kit.
pub struct SectionRepo;

impl SectionRepo {
    /// List a kit's sections in display order.
    pub async fn list_for_kit(pool: &PgPool, kit_id: DbId) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections s WHERE s.kit_id = $1 ORDER BY s.order_index, s.id"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(kit_id)
            .fetch_all(pool)
            .await
    }

    /// Append a section to the end of a kit. The kit's ownership must be
    /// checked by the caller.
    pub async fn create(
        pool: &PgPool,
        kit_id: DbId,
        input: &CreateSection,
    ) -> Result<Section, sqlx::Error> {
        let query = format!(
            "INSERT INTO sections AS s (kit_id, kind, title, description, order_index)
             VALUES ($1, $2, $3, $4,
                     (SELECT COALESCE(MAX(order_index) + 1, 0) FROM sections WHERE kit_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(kit_id)
            .bind(input.kind.as_str())
            .bind(input.title.trim())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections s
               JOIN kits k ON k.id = s.kit_id
              WHERE s.id = $1 AND k.user_id = $2"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a section's title or description.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
        input: &UpdateSection,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!(
            "UPDATE sections s SET
                title = COALESCE($3, s.title),
                description = COALESCE($4, s.description)
               FROM kits k
              WHERE s.id = $1 AND k.id = s.kit_id AND k.user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a section with its assets and team members.
    ///
    /// Returns the storage paths the section owned, or `None` if no owned
    /// section matched.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let paths: Vec<String> = sqlx::query_scalar(
            "SELECT a.storage_path FROM assets a WHERE a.section_id = $1
             UNION ALL
             SELECT t.photo_storage_path FROM team_members t
              WHERE t.section_id = $1 AND t.photo_storage_path IS NOT NULL",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query(
            "DELETE FROM sections s USING kits k
              WHERE s.id = $1 AND k.id = s.kit_id AND k.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(paths))
    }

    /// Persist a new section order for a kit and return the reordered list.
    pub async fn reorder(
        pool: &PgPool,
        kit_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<Section>, RepoError> {
        let mut tx = pool.begin().await?;
        ordering::reorder_children(&mut tx, SECTIONS, kit_id, ids).await?;
        tx.commit().await?;
        Ok(Self::list_for_kit(pool, kit_id).await?)
    }
}
