//! Repository for the `kits` table.

use kittie_core::error::CoreError;
use kittie_core::plan::ensure_can_create_kit;
use kittie_core::section::DEFAULT_SECTIONS;
use kittie_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::kit::{CreateKit, Kit, KitTree, UpdateKit};
use crate::models::section::SectionTree;
use crate::repositories::{AssetRepo, ProfileRepo, SectionRepo, TeamMemberRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, brand_id, name, slug, description, accent_color, is_public, \
                       created_at, updated_at";

/// Provides owner-scoped CRUD operations for kits.
pub struct KitRepo;

impl KitRepo {
    /// Create a kit and its default sections, enforcing the plan's kit quota.
    ///
    /// The owner's profile row is locked for the duration of the transaction
    /// so concurrent creates cannot both pass the quota check. The profile
    /// must already exist.
    pub async fn create_with_quota(
        pool: &PgPool,
        user_id: UserId,
        slug: &str,
        input: &CreateKit,
    ) -> Result<Kit, RepoError> {
        let mut tx = pool.begin().await?;

        let plan = ProfileRepo::lock_plan(&mut tx, user_id).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kits WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        ensure_can_create_kit(plan, count)?;

        if let Some(brand_id) = input.brand_id {
            let owned: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM brands WHERE id = $1 AND user_id = $2)",
            )
            .bind(brand_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            if !owned {
                return Err(CoreError::NotFound {
                    entity: "Brand",
                    id: brand_id,
                }
                .into());
            }
        }

        let query = format!(
            "INSERT INTO kits (user_id, brand_id, name, slug, description, accent_color, is_public)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, FALSE))
             RETURNING {COLUMNS}"
        );
        let kit = sqlx::query_as::<_, Kit>(&query)
            .bind(user_id)
            .bind(input.brand_id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(&input.accent_color)
            .bind(input.is_public)
            .fetch_one(&mut *tx)
            .await?;

        for (index, (kind, title)) in DEFAULT_SECTIONS.iter().enumerate() {
            sqlx::query(
                "INSERT INTO sections (kit_id, kind, title, order_index) VALUES ($1, $2, $3, $4)",
            )
            .bind(kit.id)
            .bind(kind.as_str())
            .bind(*title)
            .bind(index as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(kit_id = kit.id, %user_id, plan = %plan, existing = count, "Kit inserted");
        Ok(kit)
    }

    /// List the user's kits, most recently created first.
    pub async fn list(pool: &PgPool, user_id: UserId) -> Result<Vec<Kit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM kits WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Kit>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Kit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM kits WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Kit>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published kit by id.
    pub async fn find_public_by_id(pool: &PgPool, id: DbId) -> Result<Option<Kit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM kits WHERE id = $1 AND is_public");
        sqlx::query_as::<_, Kit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published kit by slug.
    pub async fn find_public_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Kit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM kits WHERE slug = $1 AND is_public");
        sqlx::query_as::<_, Kit>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Update a kit. Only non-`None` fields in `input` are applied, so the
    /// editor can save one field at a time.
    ///
    /// Returns `None` if the kit does not exist or belongs to someone else.
    /// Ownership of `input.brand_id` must be checked by the caller.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
        input: &UpdateKit,
    ) -> Result<Option<Kit>, sqlx::Error> {
        let query = format!(
            "UPDATE kits SET
                name = COALESCE($3, name),
                slug = COALESCE($4, slug),
                brand_id = COALESCE($5, brand_id),
                description = COALESCE($6, description),
                accent_color = COALESCE($7, accent_color),
                is_public = COALESCE($8, is_public)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Kit>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(input.brand_id)
            .bind(&input.description)
            .bind(&input.accent_color)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Delete a kit and everything under it.
    ///
    /// Returns the storage paths of every file the kit owned so the caller
    /// can remove the objects, or `None` if no owned kit matched.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let paths: Vec<String> = sqlx::query_scalar(
            "SELECT a.storage_path
               FROM assets a
               JOIN sections s ON s.id = a.section_id
               JOIN kits k ON k.id = s.kit_id
              WHERE k.id = $1 AND k.user_id = $2
             UNION ALL
             SELECT t.photo_storage_path
               FROM team_members t
               JOIN sections s ON s.id = t.section_id
               JOIN kits k ON k.id = s.kit_id
              WHERE k.id = $1 AND k.user_id = $2 AND t.photo_storage_path IS NOT NULL",
        )
        .bind(id)
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM kits WHERE id = $1 AND user_id = $2")
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

    /// Load the full editor tree for a kit the caller already resolved.
    pub async fn tree(pool: &PgPool, kit: Kit) -> Result<KitTree, sqlx::Error> {
        let sections = SectionRepo::list_for_kit(pool, kit.id).await?;
        let mut assets = AssetRepo::list_for_kit(pool, kit.id).await?;
        let mut team = TeamMemberRepo::list_for_kit(pool, kit.id).await?;

        let sections = sections
            .into_iter()
            .map(|section| {
                let (mine, rest): (Vec<_>, Vec<_>) =
                    assets.drain(..).partition(|a| a.section_id == section.id);
                assets = rest;
                let (members, rest): (Vec<_>, Vec<_>) =
                    team.drain(..).partition(|m| m.section_id == section.id);
                team = rest;
                SectionTree {
                    section,
                    assets: mine,
                    team: members,
                }
            })
            .collect();

        Ok(KitTree { kit, sections })
    }
}
