//! Repository for the `profiles` table.

use kittie_core::plan::PlanTier;
use kittie_core::types::UserId;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::error::RepoError;
use crate::models::profile::{Profile, Usage};

const COLUMNS: &str = "user_id, email, full_name, plan, created_at, updated_at";

/// Bytes stored for user `$1`: asset files plus team portraits.
const STORAGE_BYTES: &str = "(SELECT COALESCE(SUM(a.size_bytes), 0)
                               FROM assets a
                               JOIN sections s ON s.id = a.section_id
                               JOIN kits k ON k.id = s.kit_id
                              WHERE k.user_id = $1)
                          + (SELECT COALESCE(SUM(t.photo_size_bytes), 0)
                               FROM team_members t
                               JOIN sections s ON s.id = t.section_id
                               JOIN kits k ON k.id = s.kit_id
                              WHERE k.user_id = $1)";

/// Provides access to user profiles and plan usage.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Return the user's profile, creating a `free` one on first sight.
    ///
    /// `email` comes from the verified access token and refreshes the stored
    /// value when it changed.
    pub async fn ensure(
        pool: &PgPool,
        user_id: UserId,
        email: Option<&str>,
    ) -> Result<Profile, sqlx::Error> {
        sqlx::query(
            "INSERT INTO profiles (user_id, email) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET email = EXCLUDED.email
             WHERE EXCLUDED.email IS NOT NULL
               AND profiles.email IS DISTINCT FROM EXCLUDED.email",
        )
        .bind(user_id)
        .bind(email)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find(pool: &PgPool, user_id: UserId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Set the user's plan, creating the profile if the billing provider
    /// reports on a user we have not seen yet.
    pub async fn set_plan(
        pool: &PgPool,
        user_id: UserId,
        plan: PlanTier,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, plan) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET plan = EXCLUDED.plan
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(plan.as_str())
            .fetch_one(pool)
            .await
    }

    /// Count the user's kits and total stored bytes (assets and portraits).
    pub async fn usage(pool: &PgPool, user_id: UserId) -> Result<Usage, sqlx::Error> {
        let query = format!(
            "SELECT
                (SELECT COUNT(*) FROM kits WHERE user_id = $1) AS kit_count,
                ({STORAGE_BYTES})::BIGINT AS storage_bytes"
        );
        sqlx::query_as::<_, Usage>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Total stored bytes for the user, read through `executor` so quota
    /// checks can run inside the transaction that holds the profile lock.
    pub async fn storage_bytes<'e>(
        executor: impl PgExecutor<'e>,
        user_id: UserId,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT ({STORAGE_BYTES})::BIGINT");
        sqlx::query_scalar(&query)
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    /// Lock the user's profile row until `tx` ends and return their plan.
    ///
    /// Every quota check (kit count, storage) takes this lock first, so
    /// concurrent requests from one user are serialized. The profile must
    /// already exist.
    pub async fn lock_plan(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
    ) -> Result<PlanTier, RepoError> {
        let plan: String =
            sqlx::query_scalar("SELECT plan FROM profiles WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_one(&mut **tx)
                .await?;
        Ok(plan.parse()?)
    }
}
