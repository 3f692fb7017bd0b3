use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    CommissionStatus, ListingCategory, ListingStatus, QuestionCategory, ResourceKind, Role,
};

// -- JWT Claims --

/// JWT claims shared between maloga-api (REST middleware) and maloga-gateway
/// (WebSocket identify). Canonical definition lives here to keep the two in
/// lockstep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub full_name: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub full_name: String,
    pub token: String,
}

/// Profile view of the signed-in user. `is_admin` is the navigation-badge
/// flag; admin endpoints run their own role check and do not trust it.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<Role>,
    pub is_admin: bool,
}

// -- Listings --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub category: ListingCategory,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub category: ListingCategory,
    pub image_urls: Vec<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SellerContactResponse {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

// -- Images --

#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub url: String,
}

// -- Forum --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateQuestionRequest {
    pub title: String,
    pub content: String,
    pub category: QuestionCategory,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAnswerRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub category: QuestionCategory,
    pub created_at: DateTime<Utc>,
    pub answers: Vec<AnswerResponse>,
}

// -- Videos --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

// -- Directory --

#[derive(Debug, Serialize)]
pub struct SlaughterhouseResponse {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub price_per_kg: f64,
    pub service_fee: f64,
    pub phone: String,
    pub address: String,
    pub operating_hours: String,
}

// -- Education --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateResourceRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: ResourceKind,
    pub duration: Option<String>,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: ResourceKind,
    pub duration: Option<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

// -- Admin --

#[derive(Debug, PartialEq, Serialize)]
pub struct StatsResponse {
    pub total_listings: i64,
    pub total_users: i64,
    pub total_commissions: f64,
    pub pending_commissions: f64,
}

#[derive(Debug, Serialize)]
pub struct CommissionResponse {
    pub id: Uuid,
    pub listing_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub amount: f64,
    pub commission_rate: f64,
    pub commission_amount: Option<f64>,
    pub status: CommissionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<Role>,
}

/// Role selector for the admin user table. `none` clears every assignment;
/// any other value replaces the set with that single role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleSelection {
    None,
    Admin,
    Superadmin,
    Seller,
    Buyer,
}

impl RoleSelection {
    pub fn as_role(self) -> Option<Role> {
        match self {
            Self::None => None,
            Self::Admin => Some(Role::Admin),
            Self::Superadmin => Some(Role::Superadmin),
            Self::Seller => Some(Role::Seller),
            Self::Buyer => Some(Role::Buyer),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetRoleRequest {
    pub role: RoleSelection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetListingStatusRequest {
    pub status: ListingStatus,
}

#[derive(Debug, Serialize)]
pub struct AdminListingResponse {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub title: String,
    pub price: f64,
    pub location: String,
    pub category: ListingCategory,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_selection_none_clears() {
        let req: SetRoleRequest = serde_json::from_str(r#"{"role":"none"}"#).unwrap();
        assert_eq!(req.role.as_role(), None);
    }

    #[test]
    fn role_selection_maps_to_role() {
        let req: SetRoleRequest = serde_json::from_str(r#"{"role":"superadmin"}"#).unwrap();
        assert_eq!(req.role.as_role(), Some(Role::Superadmin));
    }

    #[test]
    fn register_rejects_unknown_fields() {
        let raw = r#"{"email":"a@b.c","password":"secretpw","full_name":"A","is_admin":true}"#;
        assert!(serde_json::from_str::<RegisterRequest>(raw).is_err());
    }
}
