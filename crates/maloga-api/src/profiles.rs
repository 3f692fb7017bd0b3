use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, warn};

use maloga_types::api::{Claims, MeResponse};
use maloga_types::models::Role;

use crate::auth::AppStateInner;
use crate::util::parse_timestamp;

/// Current user's profile plus the navigation admin badge.
///
/// `is_admin` here and the gate in admin.rs both look for a superadmin role
/// row, but deliberately remain separate call sites — see DESIGN.md.
pub async fn me(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let uid = claims.sub.to_string();

    let profile = state
        .db
        .get_profile(&uid)
        .map_err(|e| {
            error!("DB get_profile error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let role_names = state.db.roles_for_user(&uid).map_err(|e| {
        error!("DB roles_for_user error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let roles: Vec<Role> = role_names
        .iter()
        .filter_map(|r| {
            r.parse()
                .map_err(|e| warn!("Skipping unknown role row: {}", e))
                .ok()
        })
        .collect();

    let is_admin = roles.contains(&Role::Superadmin);

    Ok(Json(MeResponse {
        id: claims.sub,
        full_name: profile.full_name.unwrap_or_default(),
        phone: profile.phone,
        created_at: parse_timestamp(&profile.created_at, "profile"),
        roles,
        is_admin,
    }))
}
