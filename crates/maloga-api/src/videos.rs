use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use maloga_types::api::{Claims, CreateVideoRequest, ToggleLikeResponse, VideoResponse};
use maloga_types::events::{ChangeOp, Watched};

use crate::auth::AppStateInner;
use crate::util::{parse_timestamp, parse_uuid};

pub async fn list_videos(
    State(state): State<Arc<AppStateInner>>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_videos())
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("DB list_videos error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let videos: Vec<VideoResponse> = rows
        .into_iter()
        .map(|row| VideoResponse {
            id: parse_uuid(&row.id, "video"),
            owner_id: parse_uuid(&row.user_id, "video"),
            title: row.title,
            description: row.description,
            url: row.url,
            category: row.category,
            like_count: row.like_count,
            created_at: parse_timestamp(&row.created_at, "video"),
        })
        .collect();

    Ok(Json(videos))
}

pub async fn create_video(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.title.trim().is_empty() || req.url.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let video_id = Uuid::new_v4();

    state
        .db
        .insert_video(
            &video_id.to_string(),
            &claims.sub.to_string(),
            req.title.trim(),
            &req.description,
            req.url.trim(),
            &req.category,
        )
        .map_err(|e| {
            error!("DB insert_video error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    state.dispatcher.notify(Watched::Videos, ChangeOp::Insert);

    Ok((
        StatusCode::CREATED,
        Json(VideoResponse {
            id: video_id,
            owner_id: claims.sub,
            title: req.title.trim().to_string(),
            description: req.description,
            url: req.url.trim().to_string(),
            category: req.category,
            like_count: 0,
            created_at: chrono::Utc::now(),
        }),
    ))
}

/// Toggle the caller's like on a video: inserts the (video, user) pair if
/// absent, removes it if present. Toggling twice is a no-op overall.
pub async fn toggle_like(
    State(state): State<Arc<AppStateInner>>,
    Path(video_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let like_id = Uuid::new_v4();

    let result = state
        .db
        .toggle_video_like(
            &like_id.to_string(),
            &video_id.to_string(),
            &claims.sub.to_string(),
        )
        .map_err(|e| {
            error!("DB toggle_video_like error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let Some((liked, like_count)) = result else {
        return Err(StatusCode::NOT_FOUND);
    };

    let op = if liked { ChangeOp::Insert } else { ChangeOp::Delete };
    state.dispatcher.notify(Watched::VideoLikes, op);

    Ok(Json(ToggleLikeResponse { liked, like_count }))
}
