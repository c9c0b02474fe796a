use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateBrandRequest;
use crate::domain::models::brand::Brand;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_brand(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateBrandRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Brand name and slug must not be empty".into()));
    }

    let brand = Brand::new(user.id, payload.name, payload.slug);
    let created = state.brand_repo.create(&brand).await?;
    info!("Brand created: {} ({})", created.id, created.slug);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_brand(
    State(state): State<Arc<AppState>>,
    Path(brand_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let brand = state.brand_repo.find_by_id(&brand_id).await?
        .ok_or(AppError::NotFound("Brand not found".into()))?;
    Ok(Json(brand))
}

pub async fn list_brands(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let brands = state.brand_repo.list().await?;
    Ok(Json(brands))
}
