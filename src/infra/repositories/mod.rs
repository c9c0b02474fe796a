pub mod sqlite_booking_repo;
pub mod sqlite_brand_repo;
pub mod sqlite_product_repo;
pub mod sqlite_user_repo;

pub mod postgres_booking_repo;
pub mod postgres_brand_repo;
pub mod postgres_product_repo;
pub mod postgres_user_repo;
