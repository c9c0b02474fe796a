use crate::domain::models::{
    booking::Booking, brand::Brand, product::Product, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Filters for booking listings; all optional, combined with AND.
/// `statuses` is OR within itself. Date bounds select bookings whose range
/// overlaps `[start_date, end_date]` (inclusive).
#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub product_id: Option<String>,
    pub brand_id: Option<String>,
    pub user_id: Option<String>,
    pub statuses: Option<Vec<String>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn create(&self, brand: &Brand) -> Result<Brand, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Brand>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Brand>, AppError>;
    async fn list(&self) -> Result<Vec<Brand>, AppError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError>;
    async fn list_by_brand(&self, brand_id: &str) -> Result<Vec<Product>, AppError>;
    async fn list_active(&self) -> Result<Vec<Product>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking only if no PENDING/CONFIRMED booking on the same
    /// product overlaps its range. The check and the insert are one atomic
    /// statement; `None` means the dates were taken.
    async fn create_if_available(&self, booking: &Booking) -> Result<Option<Booking>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Booking>, AppError>;
    /// First PENDING/CONFIRMED booking on the product overlapping
    /// [start, end] (inclusive boundaries), optionally excluding one id.
    async fn find_conflict(
        &self,
        product_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<&str>,
    ) -> Result<Option<Booking>, AppError>;
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError>;
    /// PENDING/CONFIRMED bookings for a product, ordered by start date.
    async fn list_active_by_product(&self, product_id: &str) -> Result<Vec<Booking>, AppError>;
    /// Persists status/payment/notes mutations. Temporal range, price and
    /// associations are immutable after creation.
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError>;
}
