use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Brand {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Brand {
    pub fn new(owner_id: String, name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            name,
            slug,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
