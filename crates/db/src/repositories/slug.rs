//! First-free slug lookup for tables with a unique `slug` column.

use kittie_core::slug::slug_candidate;
use sqlx::PgPool;

/// Return `base`, or the first `base-N` not yet used in `table`.
///
/// `table` must be a trusted identifier; `base` is a validated slug and so
/// contains no `LIKE` wildcards.
pub async fn first_free_slug(pool: &PgPool, table: &'static str, base: &str) -> Result<String, sqlx::Error> {
    let query = format!("SELECT slug FROM {table} WHERE slug = $1 OR slug LIKE $2");
    let taken: Vec<String> = sqlx::query_scalar(&query)
        .bind(base)
        .bind(format!("{base}-%"))
        .fetch_all(pool)
        .await?;

    let slug = (1..)
        .map(|n| slug_candidate(base, n))
        .find(|candidate| !taken.iter().any(|t| t == candidate))
        .unwrap_or_else(|| base.to_string());
    Ok(slug)
}
