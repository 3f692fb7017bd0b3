use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, warn};

use maloga_types::api::ResourceResponse;
use maloga_types::models::ResourceKind;

use crate::auth::AppStateInner;
use crate::util::{parse_timestamp, parse_uuid};

/// Public list of learning material, newest first. Management of the rows
/// lives behind the admin surface.
pub async fn list_resources(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_resources())
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("DB list_resources error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let resources: Vec<ResourceResponse> = rows
        .into_iter()
        .map(|row| ResourceResponse {
            id: parse_uuid(&row.id, "resource"),
            title: row.title,
            description: row.description,
            category: row.category,
            kind: row.kind.parse().unwrap_or_else(|e| {
                warn!("{}", e);
                ResourceKind::Article
            }),
            duration: row.duration,
            url: row.url,
            created_at: parse_timestamp(&row.created_at, "resource"),
        })
        .collect();

    Ok(Json(resources))
}
