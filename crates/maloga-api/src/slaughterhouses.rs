use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use maloga_types::api::SlaughterhouseResponse;

use crate::auth::AppStateInner;
use crate::util::parse_uuid;

/// Processing facility directory, alphabetical. Read-only; rows come from
/// the migration seed.
pub async fn list_slaughterhouses(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_slaughterhouses())
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("DB list_slaughterhouses error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let facilities: Vec<SlaughterhouseResponse> = rows
        .into_iter()
        .map(|row| SlaughterhouseResponse {
            id: parse_uuid(&row.id, "slaughterhouse"),
            name: row.name,
            location: row.location,
            price_per_kg: row.price_per_kg,
            service_fee: row.service_fee,
            phone: row.phone,
            address: row.address,
            operating_hours: row.operating_hours,
        })
        .collect();

    Ok(Json(facilities))
}
