//! [`ObjectStorage`] over the hosted storage REST API.

use std::time::Duration;

use super::{ObjectStorage, StorageError};
use crate::config::SupabaseConfig;

/// Upload timeout; large documents on slow links need more than the
/// default request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Stores objects in a public bucket using the service-role key.
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    service_role_key: String,
    anon_key: String,
}

impl SupabaseStorage {
    pub fn new(config: &SupabaseConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: format!("{}/storage/v1", config.url),
            bucket: config.storage_bucket.clone(),
            service_role_key: config.service_role_key.clone(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/object/{}/{path}", self.base_url, self.bucket)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.anon_key)
    }
}

async fn check(response: reqwest::Response) -> Result<(), StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

#[async_trait::async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = bytes.len();
        let response = self
            .authorized(self.client.post(self.object_url(path)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        check(response).await?;
        tracing::debug!(path, size, "Stored object");
        Ok(())
    }

    async fn delete(&self, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = format!("{}/object/{}", self.base_url, self.bucket);
        let response = self
            .authorized(self.client.delete(url))
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await?;
        check(response).await?;
        tracing::debug!(count = paths.len(), "Removed objects");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{path}", self.base_url, self.bucket)
    }
}
