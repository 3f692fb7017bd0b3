use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, warn};
use uuid::Uuid;

use maloga_db::models::ListingRow;
use maloga_types::api::{
    Claims, CreateListingRequest, ListingResponse, SellerContactResponse,
};
use maloga_types::events::{ChangeOp, Watched};
use maloga_types::models::{ListingCategory, ListingStatus};

use crate::auth::AppStateInner;
use crate::util::{parse_timestamp, parse_uuid};

/// Checks a listing submission before anything touches the database.
/// A failed check writes no row.
fn validate_new_listing(req: &CreateListingRequest) -> Result<(), &'static str> {
    if req.title.trim().is_empty() {
        return Err("title is required");
    }
    if req.image_urls.is_empty() {
        return Err("at least one image is required");
    }
    if !req.price.is_finite() || req.price < 0.0 {
        return Err("price must be a non-negative number");
    }
    Ok(())
}

pub(crate) fn listing_to_response(row: ListingRow) -> ListingResponse {
    let image_urls: Vec<String> = serde_json::from_str(&row.image_urls).unwrap_or_else(|e| {
        warn!("Corrupt image_urls on listing '{}': {}", row.id, e);
        vec![]
    });

    ListingResponse {
        id: parse_uuid(&row.id, "listing"),
        seller_id: parse_uuid(&row.seller_id, "listing"),
        title: row.title,
        description: row.description,
        price: row.price,
        location: row.location,
        category: row.category.parse().unwrap_or_else(|e| {
            warn!("{}", e);
            ListingCategory::Other
        }),
        image_urls,
        status: row.status.parse().unwrap_or_else(|e| {
            warn!("{}", e);
            ListingStatus::Pending
        }),
        created_at: parse_timestamp(&row.created_at, "listing"),
    }
}

/// Public marketplace feed: active listings only, newest first. Listings
/// awaiting moderation never appear here.
pub async fn marketplace(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.active_listings())
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| { error!("DB active_listings error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let listings: Vec<ListingResponse> = rows.into_iter().map(listing_to_response).collect();

    Ok(Json(listings))
}

pub async fn create_listing(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateListingRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if let Err(reason) = validate_new_listing(&req) {
        warn!("Rejected listing from {}: {}", claims.sub, reason);
        return Err(StatusCode::BAD_REQUEST);
    }

    let listing_id = Uuid::new_v4();

    state
        .db
        .insert_listing(
            &listing_id.to_string(),
            &claims.sub.to_string(),
            req.title.trim(),
            &req.description,
            req.price,
            &req.location,
            req.category.as_str(),
            &req.image_urls,
        )
        .map_err(|e| {
            error!("DB insert_listing error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    state.dispatcher.notify(Watched::LivestockListings, ChangeOp::Insert);

    let now = chrono::Utc::now();

    Ok((
        StatusCode::CREATED,
        Json(ListingResponse {
            id: listing_id,
            seller_id: claims.sub,
            title: req.title.trim().to_string(),
            description: req.description,
            price: req.price,
            location: req.location,
            category: req.category,
            image_urls: req.image_urls,
            status: ListingStatus::Pending,
            created_at: now,
        }),
    ))
}

/// Owner delete. The row is matched on both id and seller, so deleting
/// someone else's listing reports not-found.
pub async fn delete_listing(
    State(state): State<Arc<AppStateInner>>,
    Path(listing_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let deleted = state
        .db
        .delete_listing_owned(&listing_id.to_string(), &claims.sub.to_string())
        .map_err(|e| {
            error!("DB delete_listing_owned error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }

    state.dispatcher.notify(Watched::LivestockListings, ChangeOp::Delete);

    Ok(StatusCode::NO_CONTENT)
}

/// Contact exchange: the seller's display name and phone for a listing.
pub async fn seller_contact(
    State(state): State<Arc<AppStateInner>>,
    Path(listing_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let listing = state
        .db
        .get_listing(&listing_id.to_string())
        .map_err(|e| {
            error!("DB get_listing error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let profile = state
        .db
        .get_profile(&listing.seller_id)
        .map_err(|e| {
            error!("DB get_profile error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(SellerContactResponse {
        full_name: profile.full_name,
        phone: profile.phone,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateListingRequest {
        CreateListingRequest {
            title: "Healthy Dairy Cow".into(),
            description: "Friesian, 3 years old".into(),
            price: 50_000.0,
            location: "Nakuru".into(),
            category: ListingCategory::Cattle,
            image_urls: vec!["https://img.example/cow.jpg".into()],
        }
    }

    #[test]
    fn valid_listing_passes() {
        assert!(validate_new_listing(&valid_request()).is_ok());
    }

    #[test]
    fn empty_image_list_is_rejected_regardless_of_other_fields() {
        let mut req = valid_request();
        req.image_urls.clear();
        assert!(validate_new_listing(&req).is_err());
    }

    #[test]
    fn negative_or_non_numeric_price_is_rejected() {
        let mut req = valid_request();
        req.price = -1.0;
        assert!(validate_new_listing(&req).is_err());

        req.price = f64::NAN;
        assert!(validate_new_listing(&req).is_err());

        req.price = 0.0;
        assert!(validate_new_listing(&req).is_ok());
    }

    #[test]
    fn corrupt_image_json_maps_to_empty_list() {
        let row = ListingRow {
            id: Uuid::new_v4().to_string(),
            seller_id: Uuid::new_v4().to_string(),
            title: "t".into(),
            description: "d".into(),
            price: 1.0,
            location: "l".into(),
            category: "cattle".into(),
            image_urls: "not-json".into(),
            status: "active".into(),
            created_at: "2026-08-04 10:00:00".into(),
        };
        let resp = listing_to_response(row);
        assert!(resp.image_urls.is_empty());
        assert_eq!(resp.status, ListingStatus::Active);
    }
}
