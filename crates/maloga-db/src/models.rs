/// Database row types — these map directly to SQLite rows.
/// Distinct from maloga-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct ProfileRow {
    pub id: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

pub struct ListingRow {
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub category: String,
    /// JSON array of URLs, in upload order
    pub image_urls: String,
    pub status: String,
    pub created_at: String,
}

pub struct CommissionRow {
    pub id: String,
    pub listing_id: Option<String>,
    pub seller_id: Option<String>,
    pub amount: f64,
    pub commission_rate: f64,
    pub commission_amount: Option<f64>,
    pub status: String,
    pub created_at: String,
}

pub struct QuestionRow {
    pub id: String,
    pub user_id: String,
    pub author_name: Option<String>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: String,
}

pub struct AnswerRow {
    pub id: String,
    pub question_id: String,
    pub user_id: String,
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: String,
}

pub struct VideoRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: String,
    pub like_count: i64,
    pub created_at: String,
}

pub struct SlaughterhouseRow {
    pub id: String,
    pub name: String,
    pub location: String,
    pub price_per_kg: f64,
    pub service_fee: f64,
    pub phone: String,
    pub address: String,
    pub operating_hours: String,
}

pub struct ResourceRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub duration: Option<String>,
    pub url: String,
    pub created_by: String,
    pub created_at: String,
}
