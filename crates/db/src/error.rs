use kittie_core::error::CoreError;

/// Error for repository operations that enforce a domain rule (quotas,
/// ownership of referenced rows, reorder validity) inside a transaction.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
