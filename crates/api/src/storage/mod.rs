//! Object storage for uploaded kit files.
//!
//! Handlers talk to [`ObjectStorage`]; production wires in
//! [`SupabaseStorage`], tests an in-memory double.

mod supabase;

pub use supabase::SupabaseStorage;

/// Error type for object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage service answered with a non-2xx status.
    #[error("Storage returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

/// A bucket of publicly readable objects addressed by path.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path`. Fails if an object already exists there.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    /// Remove the objects at `paths`. Missing objects are not an error.
    async fn delete(&self, paths: &[String]) -> Result<(), StorageError>;

    /// Public URL an object can be fetched from without credentials.
    fn public_url(&self, path: &str) -> String;
}
