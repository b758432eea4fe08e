//! Upload API endpoints
//!
//! Handles file uploads for study materials (PDFs, slide decks, images).
//! Accepts multipart/form-data with a single field named "file"; the
//! stored filename is a fresh UUID so uploads can never collide or
//! traverse outside the upload directory.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use uuid::Uuid;

use crate::api::middleware::{ApiError, AppState};

/// Response for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub file: UploadedFile,
}

/// Stored file metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Public URL the file is served from
    pub url: String,
    /// Filename under the upload directory
    pub path: String,
    pub content_type: String,
    pub bytes: u64,
}

/// Build the upload router
pub fn router(max_file_size: u64) -> Router<AppState> {
    Router::new()
        .route("/", post(upload_file))
        // The multipart envelope adds boundary overhead on top of the
        // file cap itself.
        .layer(DefaultBodyLimit::max(max_file_size as usize + 64 * 1024))
}

/// POST /api/upload - Upload a single file
///
/// Requires an admin session.
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let config = &state.upload_config;

    fs::create_dir_all(&config.path).await.map_err(|e| {
        ApiError::internal_error(format!("Failed to create upload directory: {}", e))
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.bin".to_string());

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;

        if data.len() as u64 > config.max_file_size {
            return Err(ApiError::validation_error(format!(
                "File too large. Maximum size: {} bytes",
                config.max_file_size
            )));
        }

        let filename = match extension(&original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let file_path = config.path.join(&filename);

        fs::write(&file_path, &data)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to save file: {}", e)))?;

        let url = format!(
            "{}/{}",
            config.url_prefix.trim_end_matches('/'),
            filename
        );

        return Ok(Json(UploadResponse {
            ok: true,
            file: UploadedFile {
                url,
                path: filename,
                content_type,
                bytes: data.len() as u64,
            },
        }));
    }

    Err(ApiError::validation_error("Missing 'file' field"))
}

/// Sanitized extension from the client-supplied filename. Only short
/// alphanumeric extensions survive; anything else is dropped.
fn extension(filename: &str) -> Option<&str> {
    let ext = Path::new(filename).extension()?.to_str()?;
    if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext)
    } else {
        None
    }
}
