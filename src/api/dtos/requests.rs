use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateBrandRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub price_unit: Option<String>,
}

/// Required fields are Options so missing ones can be reported by name
/// instead of failing JSON extraction wholesale.
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub product_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_org: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub product_id: Option<String>,
    pub brand_id: Option<String>,
    pub user_id: Option<String>,
    /// Comma-separated, OR semantics.
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}
