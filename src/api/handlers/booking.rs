use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::dtos::requests::{CreateBookingRequest, ListBookingsQuery, UpdateBookingRequest};
use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams, PaymentStatus, PublicBooking};
use crate::domain::models::user::User;
use crate::domain::ports::BookingFilter;
use crate::domain::services::{access, calendar};
use crate::domain::services::availability::compute_total_price;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 500;
const CODE_GENERATION_ATTEMPTS: u32 = 5;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (product_id, start_date, end_date, customer_name, customer_phone) = match (
        payload.product_id.filter(|s| !s.trim().is_empty()),
        payload.start_date,
        payload.end_date,
        payload.customer_name.filter(|s| !s.trim().is_empty()),
        payload.customer_phone.filter(|s| !s.trim().is_empty()),
    ) {
        (Some(p), Some(s), Some(e), Some(n), Some(ph)) => (p, s, e, n, ph),
        (p, s, e, n, ph) => {
            let mut missing = Vec::new();
            if p.is_none() { missing.push("product_id"); }
            if s.is_none() { missing.push("start_date"); }
            if e.is_none() { missing.push("end_date"); }
            if n.is_none() { missing.push("customer_name"); }
            if ph.is_none() { missing.push("customer_phone"); }
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
    };

    if end_date < start_date {
        return Err(AppError::Validation("end_date must not be before start_date".into()));
    }

    let product = state.product_repo.find_by_id(&product_id).await?
        .filter(|p| p.is_active)
        .ok_or(AppError::NotFound("Product not found".into()))?;

    let brand = state.brand_repo.find_by_id(&product.brand_id).await?
        .filter(|b| b.is_active)
        .ok_or(AppError::NotFound("Brand not found".into()))?;

    if let Some(conflict) = state.booking_repo
        .find_conflict(&product.id, start_date, end_date, None)
        .await?
    {
        warn!("Booking rejected: dates overlap existing booking {}", conflict.id);
        return Err(AppError::Conflict("Selected dates are not available".into()));
    }

    let total_price = compute_total_price(product.price, start_date, end_date);

    let mut booking_code = Booking::generate_code(Utc::now());
    let mut attempts = 1;
    while state.booking_repo.find_by_code(&booking_code).await?.is_some() {
        attempts += 1;
        if attempts > CODE_GENERATION_ATTEMPTS {
            return Err(AppError::Internal);
        }
        booking_code = Booking::generate_code(Utc::now());
    }

    let booking = Booking::new(NewBookingParams {
        booking_code,
        product_id: product.id.clone(),
        brand_id: brand.id.clone(),
        user_id: user.map(|u| u.id),
        start_date,
        end_date,
        customer_name,
        customer_phone,
        customer_email: payload.customer_email,
        customer_org: payload.customer_org,
        notes: payload.notes,
        total_price,
    });

    // The repo re-checks the overlap atomically with the insert; losing the
    // race here surfaces the same conflict as the pre-check above.
    let created = state.booking_repo.create_if_available(&booking).await?
        .ok_or(AppError::Conflict("Selected dates are not available".into()))?;

    info!("Booking created: {} ({})", created.id, created.booking_code);

    Ok((StatusCode::CREATED, Json(serde_json::json!({
        "booking": created,
        "product": { "id": product.id, "name": product.name, "price": product.price, "price_unit": product.price_unit },
        "brand": { "id": brand.id, "name": brand.name }
    }))))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Response, AppError> {
    let statuses = parse_status_filter(query.status.as_deref())?;
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    if query.brand_id.is_none() && query.user_id.is_none() {
        if query.product_id.is_some() {
            // Product-only listing powers the public availability calendar:
            // open to anyone, but stripped of customer data.
            let filter = BookingFilter {
                product_id: query.product_id.clone(),
                statuses,
                start_date: query.start_date,
                end_date: query.end_date,
                limit,
                offset,
                ..Default::default()
            };
            let bookings = state.booking_repo.list(&filter).await?;
            let public: Vec<PublicBooking> = bookings.iter().map(PublicBooking::from).collect();
            return Ok(Json(public).into_response());
        }

        let Some(user) = user else { return Err(AppError::Unauthorized) };
        let filter = BookingFilter {
            user_id: if user.is_admin() { None } else { Some(user.id.clone()) },
            statuses,
            start_date: query.start_date,
            end_date: query.end_date,
            limit,
            offset,
            ..Default::default()
        };
        let bookings = state.booking_repo.list(&filter).await?;
        return Ok(Json(bookings).into_response());
    }

    let Some(user) = user else { return Err(AppError::Unauthorized) };

    let brand = match &query.brand_id {
        Some(brand_id) => {
            match state.brand_repo.find_by_id(brand_id).await? {
                Some(b) => Some(b),
                None if user.is_admin() => return Err(AppError::NotFound("Brand not found".into())),
                None => return Err(AppError::Forbidden("You do not own this brand".into())),
            }
        }
        None => None,
    };

    access::authorize_booking_list(&user, brand.as_ref(), query.user_id.as_deref())?;

    let filter = BookingFilter {
        product_id: query.product_id,
        brand_id: query.brand_id,
        user_id: query.user_id,
        statuses,
        start_date: query.start_date,
        end_date: query.end_date,
        limit,
        offset,
    };
    let bookings = state.booking_repo.list(&filter).await?;
    Ok(Json(bookings).into_response())
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id_or_code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = resolve_booking(&state, user.as_ref(), &id_or_code).await?;
    Ok(Json(booking))
}

pub async fn get_booking_ics(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id_or_code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = resolve_booking(&state, user.as_ref(), &id_or_code).await?;
    let product = state.product_repo.find_by_id(&booking.product_id).await?
        .ok_or(AppError::Internal)?;

    let ics = calendar::generate_ics(&product, &booking);
    Ok((
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        ics,
    ))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(mut booking) = state.booking_repo.find_by_id(&booking_id).await? else {
        return Err(access::booking_missing(Some(&user)));
    };
    let brand = state.brand_repo.find_by_id(&booking.brand_id).await?
        .ok_or(AppError::Internal)?;

    let new_status = payload.status.as_deref()
        .map(|s| BookingStatus::parse(s)
            .ok_or_else(|| AppError::Validation(format!("Invalid status value: {s}"))))
        .transpose()?;
    let new_payment_status = payload.payment_status.as_deref()
        .map(|s| PaymentStatus::parse(s)
            .ok_or_else(|| AppError::Validation(format!("Invalid payment status value: {s}"))))
        .transpose()?;

    let cancel_only = new_status == Some(BookingStatus::Cancelled)
        && payload.payment_status.is_none()
        && payload.payment_method.is_none()
        && payload.notes.is_none();

    access::authorize_booking_update(&user, &booking, &brand, cancel_only)?;

    if let Some(next) = new_status {
        let current = booking.status().ok_or(AppError::Internal)?;
        if !current.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Illegal status transition {} -> {}",
                current.as_str(),
                next.as_str()
            )));
        }
        booking.status = next.as_str().to_string();
    }

    if let Some(next) = new_payment_status {
        let current = booking.payment_status().ok_or(AppError::Internal)?;
        if !current.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Illegal payment status transition {} -> {}",
                current.as_str(),
                next.as_str()
            )));
        }
        booking.payment_status = next.as_str().to_string();
    }

    if let Some(method) = payload.payment_method {
        booking.payment_method = if method.is_empty() { None } else { Some(method) };
    }
    if let Some(notes) = payload.notes {
        booking.notes = if notes.is_empty() { None } else { Some(notes) };
    }

    let updated = state.booking_repo.update(&booking).await?;
    info!("Booking updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(booking) = state.booking_repo.find_by_id(&booking_id).await? else {
        return Err(access::booking_missing(Some(&user)));
    };
    let brand = state.brand_repo.find_by_id(&booking.brand_id).await?
        .ok_or(AppError::Internal)?;

    access::authorize_booking_cancel(&user, &booking, &brand)?;

    let current = booking.status().ok_or(AppError::Internal)?;
    if current == BookingStatus::Cancelled {
        return Ok(Json(booking));
    }
    if !current.can_transition_to(BookingStatus::Cancelled) {
        return Err(AppError::Validation(format!(
            "Illegal status transition {} -> CANCELLED",
            current.as_str()
        )));
    }

    let cancelled = state.booking_repo.cancel(&booking).await?;
    info!("Booking cancelled: {}", cancelled.id);
    Ok(Json(cancelled))
}

/// Resolves a path segment as a booking code first, then as an internal id.
/// A code match grants access by itself (the code is the customer's tracking
/// token); an id lookup goes through the access gate and answers Forbidden
/// for out-of-scope callers whether or not the row exists.
async fn resolve_booking(
    state: &AppState,
    user: Option<&User>,
    id_or_code: &str,
) -> Result<Booking, AppError> {
    if let Some(booking) = state.booking_repo.find_by_code(id_or_code).await? {
        return Ok(booking);
    }

    let Some(booking) = state.booking_repo.find_by_id(id_or_code).await? else {
        return Err(access::booking_missing(user));
    };
    let Some(user) = user else { return Err(AppError::Unauthorized) };

    let brand = state.brand_repo.find_by_id(&booking.brand_id).await?
        .ok_or(AppError::Internal)?;
    access::authorize_booking_view(user, &booking, &brand)?;
    Ok(booking)
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<Vec<String>>, AppError> {
    let Some(raw) = raw else { return Ok(None) };

    let mut statuses = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let status = BookingStatus::parse(part)
            .ok_or_else(|| AppError::Validation(format!("Invalid status value: {part}")))?;
        statuses.push(status.as_str().to_string());
    }

    Ok(if statuses.is_empty() { None } else { Some(statuses) })
}
