use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, warn};
use uuid::Uuid;

use maloga_db::models::CommissionRow;
use maloga_types::api::{
    AdminListingResponse, AdminUserResponse, Claims, CommissionResponse, CreateResourceRequest,
    ResourceResponse, SetListingStatusRequest, SetRoleRequest, StatsResponse,
};
use maloga_types::events::{ChangeOp, Watched};
use maloga_types::models::{CommissionStatus, ListingCategory, ListingStatus, Role};

use crate::auth::AppStateInner;
use crate::util::{parse_timestamp, parse_uuid};

/// Gate for every admin endpoint: the caller must hold a superadmin role
/// row right now. Roles are re-read on each request — revoking one takes
/// effect on the next call, with no cached flag to clear.
async fn require_superadmin(
    state: &Arc<AppStateInner>,
    claims: &Claims,
) -> Result<(), StatusCode> {
    let elevated = state
        .db
        .is_superadmin(&claims.sub.to_string())
        .map_err(|e| {
            error!("DB is_superadmin error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !elevated {
        warn!("{} denied access to admin surface", claims.sub);
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(())
}

/// Dashboard figures reduced from raw commission rows.
#[derive(Debug, PartialEq)]
pub struct CommissionTotals {
    pub total: f64,
    pub pending: f64,
}

/// Sum commission earnings: `total` over every record, `pending` over the
/// records still awaiting completion. Rows with no stored amount count as
/// zero. An empty slice yields zeroes.
pub fn aggregate_commissions(records: &[CommissionRow]) -> CommissionTotals {
    let total = records
        .iter()
        .map(|r| r.commission_amount.unwrap_or(0.0))
        .sum();

    let pending = records
        .iter()
        .filter(|r| r.status == CommissionStatus::Pending.as_str())
        .map(|r| r.commission_amount.unwrap_or(0.0))
        .sum();

    CommissionTotals { total, pending }
}

// -- Dashboard --

pub async fn stats(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    let db = state.clone();
    let (total_listings, total_users, commissions) = tokio::task::spawn_blocking(move || {
        let listings = db.db.count_listings()?;
        let users = db.db.count_profiles()?;
        let commissions = db.db.all_commissions()?;
        Ok::<_, anyhow::Error>((listings, users, commissions))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .map_err(|e| { error!("DB stats error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let totals = aggregate_commissions(&commissions);

    Ok(Json(StatsResponse {
        total_listings,
        total_users,
        total_commissions: totals.total,
        pending_commissions: totals.pending,
    }))
}

pub async fn list_commissions(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.all_commissions())
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("DB all_commissions error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let commissions: Vec<CommissionResponse> = rows
        .into_iter()
        .map(|row| CommissionResponse {
            id: parse_uuid(&row.id, "commission"),
            listing_id: row.listing_id.as_deref().map(|id| parse_uuid(id, "commission")),
            seller_id: row.seller_id.as_deref().map(|id| parse_uuid(id, "commission")),
            amount: row.amount,
            commission_rate: row.commission_rate,
            commission_amount: row.commission_amount,
            status: row.status.parse().unwrap_or_else(|e| {
                warn!("{}", e);
                CommissionStatus::Pending
            }),
            created_at: parse_timestamp(&row.created_at, "commission"),
        })
        .collect();

    Ok(Json(commissions))
}

// -- User management --

pub async fn list_users(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    let db = state.clone();
    let (profiles, role_rows) = tokio::task::spawn_blocking(move || {
        let profiles = db.db.list_profiles()?;
        let roles = db.db.all_roles()?;
        Ok::<_, anyhow::Error>((profiles, roles))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .map_err(|e| { error!("DB list_users error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    // Combine: user_id -> roles
    let mut role_map: HashMap<String, Vec<Role>> = HashMap::new();
    for (user_id, role) in role_rows {
        match role.parse::<Role>() {
            Ok(role) => role_map.entry(user_id).or_default().push(role),
            Err(e) => warn!("Skipping unknown role row: {}", e),
        }
    }

    let users: Vec<AdminUserResponse> = profiles
        .into_iter()
        .map(|profile| AdminUserResponse {
            roles: role_map.remove(&profile.id).unwrap_or_default(),
            id: parse_uuid(&profile.id, "profile"),
            full_name: profile.full_name,
            phone: profile.phone,
            created_at: parse_timestamp(&profile.created_at, "profile"),
        })
        .collect();

    Ok(Json(users))
}

/// Replace the target user's role set. `none` clears it; anything else
/// leaves exactly one row. Delete and insert commit together, so no reader
/// sees a half-applied change.
pub async fn set_user_role(
    State(state): State<Arc<AppStateInner>>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SetRoleRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    let role = req.role.as_role();

    state
        .db
        .set_role(&user_id.to_string(), role.map(|r| r.as_str()))
        .map_err(|e| {
            error!("DB set_role error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(StatusCode::NO_CONTENT)
}

// -- Listing moderation --

pub async fn list_all_listings(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    let db = state.clone();
    let (rows, profiles) = tokio::task::spawn_blocking(move || {
        let rows = db.db.all_listings()?;
        let profiles = db.db.list_profiles()?;
        Ok::<_, anyhow::Error>((rows, profiles))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
    .map_err(|e| { error!("DB list_all_listings error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let names: HashMap<String, String> = profiles
        .into_iter()
        .filter_map(|p| p.full_name.map(|name| (p.id, name)))
        .collect();

    let listings: Vec<AdminListingResponse> = rows
        .into_iter()
        .map(|row| AdminListingResponse {
            seller_name: names
                .get(&row.seller_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            id: parse_uuid(&row.id, "listing"),
            seller_id: parse_uuid(&row.seller_id, "listing"),
            title: row.title,
            price: row.price,
            location: row.location,
            category: row.category.parse().unwrap_or_else(|e| {
                warn!("{}", e);
                ListingCategory::Other
            }),
            status: row.status.parse().unwrap_or_else(|e| {
                warn!("{}", e);
                ListingStatus::Pending
            }),
            created_at: parse_timestamp(&row.created_at, "listing"),
        })
        .collect();

    Ok(Json(listings))
}

/// Approve or reject a listing. Only `active` and `inactive` are reachable
/// through this path; a pending status cannot be reassigned.
pub async fn set_listing_status(
    State(state): State<Arc<AppStateInner>>,
    Path(listing_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SetListingStatusRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    if !matches!(req.status, ListingStatus::Active | ListingStatus::Inactive) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let changed = state
        .db
        .set_listing_status(&listing_id.to_string(), req.status.as_str())
        .map_err(|e| {
            error!("DB set_listing_status error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !changed {
        return Err(StatusCode::NOT_FOUND);
    }

    state.dispatcher.notify(Watched::LivestockListings, ChangeOp::Update);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_listing(
    State(state): State<Arc<AppStateInner>>,
    Path(listing_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    let deleted = state
        .db
        .delete_listing(&listing_id.to_string())
        .map_err(|e| {
            error!("DB delete_listing error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }

    state.dispatcher.notify(Watched::LivestockListings, ChangeOp::Delete);

    Ok(StatusCode::NO_CONTENT)
}

// -- Educational resources --

pub async fn create_resource(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateResourceRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    if req.title.trim().is_empty() || req.url.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let resource_id = Uuid::new_v4();

    state
        .db
        .insert_resource(
            &resource_id.to_string(),
            req.title.trim(),
            &req.description,
            &req.category,
            req.kind.as_str(),
            req.duration.as_deref(),
            req.url.trim(),
            &claims.sub.to_string(),
        )
        .map_err(|e| {
            error!("DB insert_resource error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    state.dispatcher.notify(Watched::EducationalResources, ChangeOp::Insert);

    Ok((
        StatusCode::CREATED,
        Json(ResourceResponse {
            id: resource_id,
            title: req.title.trim().to_string(),
            description: req.description,
            category: req.category,
            kind: req.kind,
            duration: req.duration,
            url: req.url.trim().to_string(),
            created_at: chrono::Utc::now(),
        }),
    ))
}

pub async fn delete_resource(
    State(state): State<Arc<AppStateInner>>,
    Path(resource_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    require_superadmin(&state, &claims).await?;

    let deleted = state
        .db
        .delete_resource(&resource_id.to_string())
        .map_err(|e| {
            error!("DB delete_resource error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }

    state.dispatcher.notify(Watched::EducationalResources, ChangeOp::Delete);

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commission(amount: f64, rate: f64, commission_amount: Option<f64>, status: &str) -> CommissionRow {
        CommissionRow {
            id: Uuid::new_v4().to_string(),
            listing_id: None,
            seller_id: None,
            amount,
            commission_rate: rate,
            commission_amount,
            status: status.to_string(),
            created_at: "2026-08-04 10:00:00".to_string(),
        }
    }

    #[test]
    fn empty_record_set_aggregates_to_zero() {
        let totals = aggregate_commissions(&[]);
        assert_eq!(totals, CommissionTotals { total: 0.0, pending: 0.0 });
    }

    #[test]
    fn totals_split_by_pending_status() {
        let records = vec![
            commission(1000.0, 10.0, Some(100.0), "completed"),
            commission(500.0, 10.0, Some(50.0), "pending"),
        ];

        let totals = aggregate_commissions(&records);
        assert_eq!(totals.total, 150.0);
        assert_eq!(totals.pending, 50.0);
    }

    #[test]
    fn missing_amounts_count_as_zero() {
        let records = vec![
            commission(1000.0, 10.0, None, "pending"),
            commission(500.0, 10.0, Some(50.0), "pending"),
        ];

        let totals = aggregate_commissions(&records);
        assert_eq!(totals.total, 50.0);
        assert_eq!(totals.pending, 50.0);
    }

    #[test]
    fn cancelled_records_only_count_toward_total() {
        let records = vec![
            commission(1000.0, 10.0, Some(100.0), "cancelled"),
            commission(500.0, 10.0, Some(50.0), "pending"),
        ];

        let totals = aggregate_commissions(&records);
        assert_eq!(totals.total, 150.0);
        assert_eq!(totals.pending, 50.0);
    }

    #[test]
    fn derived_amount_matches_rate_product() {
        // commission_amount should equal amount * rate / 100 when present
        let records = vec![
            commission(1000.0, 10.0, Some(100.0), "completed"),
            commission(500.0, 10.0, Some(50.0), "pending"),
        ];
        for r in &records {
            let derived = r.amount * r.commission_rate / 100.0;
            assert_eq!(r.commission_amount.unwrap(), derived);
        }
    }
}
