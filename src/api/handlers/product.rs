use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateProductRequest, DateRangeQuery};
use crate::api::dtos::responses::{AvailabilityResponse, ConflictingBookingRef};
use crate::domain::models::product::{NewProductParams, Product};
use crate::domain::services::{access, availability, calendar};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

const PRICE_UNITS: [&str; 3] = ["hour", "day", "package"];

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(brand_id): Path<String>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let brand = state.brand_repo.find_by_id(&brand_id).await?
        .ok_or(AppError::NotFound("Brand not found".into()))?;

    if !user.is_admin() && !access::owns_brand(&user, &brand) {
        return Err(AppError::Forbidden("You do not own this brand".into()));
    }

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Product name must not be empty".into()));
    }
    if payload.price < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    let price_unit = payload.price_unit.unwrap_or_else(|| "day".to_string());
    if !PRICE_UNITS.contains(&price_unit.as_str()) {
        return Err(AppError::Validation("price_unit must be one of hour, day, package".into()));
    }

    let product = Product::new(NewProductParams {
        brand_id: brand.id,
        name: payload.name,
        description: payload.description,
        price: payload.price,
        price_unit,
    });

    let created = state.product_repo.create(&product).await?;
    info!("Product created: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_brand_products(
    State(state): State<Arc<AppState>>,
    Path(brand_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let brand = state.brand_repo.find_by_id(&brand_id).await?
        .ok_or(AppError::NotFound("Brand not found".into()))?;

    let products = state.product_repo.list_by_brand(&brand.id).await?;
    Ok(Json(products))
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.product_repo.list_active().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_id(&product_id).await?
        .ok_or(AppError::NotFound("Product not found".into()))?;
    Ok(Json(product))
}

pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(start), Some(end)) = (query.start_date, query.end_date) else {
        return Err(AppError::Validation("start_date and end_date are required".into()));
    };
    if end < start {
        return Err(AppError::Validation("end_date must not be before start_date".into()));
    }

    let product = state.product_repo.find_by_id(&product_id).await?
        .filter(|p| p.is_active)
        .ok_or(AppError::NotFound("Product not found".into()))?;

    let conflict = state.booking_repo.find_conflict(&product.id, start, end, None).await?;

    Ok(Json(AvailabilityResponse {
        available: conflict.is_none(),
        conflicting_booking: conflict.map(|b| ConflictingBookingRef {
            id: b.id,
            start_date: b.start_date,
            end_date: b.end_date,
        }),
    }))
}

pub async fn get_product_calendar(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_id(&product_id).await?
        .ok_or(AppError::NotFound("Product not found".into()))?;

    let bookings = state.booking_repo.list_active_by_product(&product.id).await?;
    let window_start = query.start_date.unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);
    let window_end = query.end_date.unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
    let windowed: Vec<_> = bookings
        .into_iter()
        .filter(|b| availability::overlaps(b.start_date, b.end_date, window_start, window_end))
        .collect();

    Ok(Json(calendar::project_busy_intervals(&windowed)))
}
