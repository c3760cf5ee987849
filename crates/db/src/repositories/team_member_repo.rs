//! Repository for the `team_members` table.

use kittie_core::plan::ensure_upload_fits;
use kittie_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::team_member::{CreateTeamMember, TeamMember, UpdateTeamMember};
use crate::repositories::ordering::{self, TEAM_MEMBERS};
use crate::repositories::ProfileRepo;

const COLUMNS: &str = "t.id, t.section_id, t.name, t.role, t.bio, t.email, t.photo_url, \
                       t.photo_storage_path, t.photo_size_bytes, t.order_index, t.created_at, \
                       t.updated_at";

/// Provides CRUD and ordering for team bios.
pub struct TeamMemberRepo;

impl TeamMemberRepo {
    /// Append a member to the end of a team section.
    pub async fn create(
        pool: &PgPool,
        section_id: DbId,
        input: &CreateTeamMember,
    ) -> Result<TeamMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_members AS t (section_id, name, role, bio, email, order_index)
             VALUES ($1, $2, $3, $4, $5,
                     (SELECT COALESCE(MAX(order_index) + 1, 0) FROM team_members WHERE section_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(section_id)
            .bind(input.name.trim())
            .bind(&input.role)
            .bind(&input.bio)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_section(
        pool: &PgPool,
        section_id: DbId,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_members t WHERE t.section_id = $1 ORDER BY t.order_index, t.id"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(section_id)
            .fetch_all(pool)
            .await
    }

    /// Every team member of a kit, ordered by section then position.
    pub async fn list_for_kit(pool: &PgPool, kit_id: DbId) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_members t
               JOIN sections s ON s.id = t.section_id
              WHERE s.kit_id = $1
              ORDER BY s.order_index, s.id, t.order_index, t.id"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(kit_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_members t
               JOIN sections s ON s.id = t.section_id
               JOIN kits k ON k.id = s.kit_id
              WHERE t.id = $1 AND k.user_id = $2"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
        input: &UpdateTeamMember,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!(
            "UPDATE team_members t SET
                name = COALESCE($3, t.name),
                role = COALESCE($4, t.role),
                bio = COALESCE($5, t.bio),
                email = COALESCE($6, t.email)
               FROM sections s
               JOIN kits k ON k.id = s.kit_id
              WHERE t.id = $1 AND s.id = t.section_id AND k.user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.role)
            .bind(&input.bio)
            .bind(&input.email)
            .fetch_optional(pool)
            .await
    }

    /// Point an owned member at a newly uploaded portrait of `size_bytes`.
    ///
    /// The owner's storage quota is re-checked with their profile row
    /// locked. The portrait being replaced no longer counts toward it.
    /// Returns `None` when no such member belongs to the user.
    pub async fn set_photo(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
        photo_url: &str,
        photo_storage_path: &str,
        size_bytes: i64,
    ) -> Result<Option<TeamMember>, RepoError> {
        let mut tx = pool.begin().await?;
        let plan = ProfileRepo::lock_plan(&mut tx, user_id).await?;

        let previous: Option<i64> = sqlx::query_scalar(
            "SELECT t.photo_size_bytes FROM team_members t
               JOIN sections s ON s.id = t.section_id
               JOIN kits k ON k.id = s.kit_id
              WHERE t.id = $1 AND k.user_id = $2
                FOR UPDATE OF t",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        let used = ProfileRepo::storage_bytes(&mut *tx, user_id).await? - previous;
        ensure_upload_fits(plan, size_bytes.max(0) as u64, used.max(0) as u64)?;

        let query = format!(
            "UPDATE team_members t
                SET photo_url = $2, photo_storage_path = $3, photo_size_bytes = $4
              WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        let member = sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(photo_url)
            .bind(photo_storage_path)
            .bind(size_bytes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(member))
    }

    /// Delete a member. Returns `Some(photo path)` when an owned row was
    /// removed; the inner value is `None` if it had no portrait.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Option<String>>, sqlx::Error> {
        sqlx::query_scalar(
            "DELETE FROM team_members t USING sections s, kits k
              WHERE t.id = $1 AND s.id = t.section_id AND k.id = s.kit_id AND k.user_id = $2
             RETURNING t.photo_storage_path",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Persist a new member order for a section and return the reordered list.
    pub async fn reorder(
        pool: &PgPool,
        section_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<TeamMember>, RepoError> {
        let mut tx = pool.begin().await?;
        ordering::reorder_children(&mut tx, TEAM_MEMBERS, section_id, ids).await?;
        tx.commit().await?;
        Ok(Self::list_for_section(pool, section_id).await?)
    }
}
