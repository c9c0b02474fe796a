use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Product {
    pub id: String,
    pub brand_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in minor currency units per price_unit.
    pub price: i64,
    /// "hour" | "day" | "package". Pricing currently ignores this, see
    /// the billable-days formula in domain::services::availability.
    pub price_unit: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewProductParams {
    pub brand_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub price_unit: String,
}

impl Product {
    pub fn new(params: NewProductParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            brand_id: params.brand_id,
            name: params.name,
            description: params.description,
            price: params.price,
            price_unit: params.price_unit,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
