use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, BrandRepository, ProductRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub brand_repo: Arc<dyn BrandRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub auth_service: Arc<AuthService>,
}
