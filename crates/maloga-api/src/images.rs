use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::error;
use uuid::Uuid;

use maloga_types::api::{Claims, ImageUploadResponse};

use crate::auth::AppStateInner;

/// 10 MB upload limit for listing images
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub ext: String,
}

/// POST /images?ext=jpg — accepts raw image bytes, saves to
/// {upload_dir}/{user_id}/{random}.{ext}, returns the public URL the file
/// will be served from.
pub async fn upload_image(
    State(state): State<Arc<AppStateInner>>,
    Query(query): Query<ImageQuery>,
    Extension(claims): Extension<Claims>,
    bytes: Bytes,
) -> Result<(StatusCode, Json<ImageUploadResponse>), StatusCode> {
    if bytes.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    // The extension goes into a filesystem path; only known image suffixes pass
    let ext = query.ext.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let file_name = format!("{}.{}", Uuid::new_v4(), ext);
    let user_dir = state.upload_dir.join(claims.sub.to_string());

    tokio::fs::create_dir_all(&user_dir).await.map_err(|e| {
        error!("Failed to create upload directory {}: {}", user_dir.display(), e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let file_path = user_dir.join(&file_name);
    let mut file = tokio::fs::File::create(&file_path).await.map_err(|e| {
        error!("Failed to create file {}: {}", file_path.display(), e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    file.write_all(&bytes).await.map_err(|e| {
        error!("Failed to write file {}: {}", file_path.display(), e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ImageUploadResponse {
            url: format!("/uploads/{}/{}", claims.sub, file_name),
        }),
    ))
}
