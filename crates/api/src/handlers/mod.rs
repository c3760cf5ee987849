pub mod asset;
pub mod billing;
pub mod brand;
pub mod kit;
pub mod profile;
pub mod public;
pub mod section;
pub mod team;

use std::collections::HashMap;

use axum::extract::Multipart;
use kittie_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of the `PUT .../order` endpoints: every child id in its new order.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<DbId>,
}

/// A file part read from a multipart form, plus any text fields.
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub fields: HashMap<String, String>,
}

/// Read a multipart form with a required `file` field.
pub async fn read_upload(mut multipart: Multipart) -> AppResult<Upload> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((filename, content_type, data.to_vec()));
        } else if !name.is_empty() {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            fields.insert(name, text);
        }
    }

    let (filename, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    Ok(Upload {
        filename,
        content_type,
        bytes,
        fields,
    })
}

/// Remove stored objects after their rows are gone.
///
/// Failures are logged and otherwise ignored: the rows no longer reference
/// the objects, so an orphaned file is the worst outcome.
pub async fn remove_objects(state: &AppState, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    if let Err(e) = state.storage.delete(paths).await {
        tracing::warn!(error = %e, count = paths.len(), "Failed to remove stored objects");
    }
}
