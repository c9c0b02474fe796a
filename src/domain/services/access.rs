use crate::domain::models::{booking::Booking, brand::Brand, user::User};
use crate::error::AppError;

/// Per-operation authorization for the booking endpoints.
///
/// Identity classes: Anonymous, AuthenticatedUser, BrandOwner (of the brand
/// a booking belongs to), Admin. Callers outside a booking's access scope
/// must not learn whether it exists, so lookups by internal id answer
/// Forbidden for them whether or not the row is there; only admins get a
/// real NotFound.

pub fn owns_brand(user: &User, brand: &Brand) -> bool {
    brand.owner_id == user.id
}

pub fn is_booker(user: &User, booking: &Booking) -> bool {
    booking.user_id.as_deref() == Some(user.id.as_str())
}

/// Error for a booking that could not be resolved by internal id.
pub fn booking_missing(user: Option<&User>) -> AppError {
    match user {
        None => AppError::Unauthorized,
        Some(u) if u.is_admin() => AppError::NotFound("Booking not found".into()),
        Some(_) => AppError::Forbidden("You do not have access to this booking".into()),
    }
}

/// Read by internal id: booker, brand owner or admin.
pub fn authorize_booking_view(user: &User, booking: &Booking, brand: &Brand) -> Result<(), AppError> {
    if user.is_admin() || owns_brand(user, brand) || is_booker(user, booking) {
        Ok(())
    } else {
        Err(AppError::Forbidden("You do not have access to this booking".into()))
    }
}

/// Update: brand owner or admin may change anything; the original booker is
/// limited to self-service cancellation, which `cancel_only` signals.
pub fn authorize_booking_update(
    user: &User,
    booking: &Booking,
    brand: &Brand,
    cancel_only: bool,
) -> Result<(), AppError> {
    if user.is_admin() || owns_brand(user, brand) {
        return Ok(());
    }
    if is_booker(user, booking) {
        if cancel_only {
            return Ok(());
        }
        return Err(AppError::Forbidden(
            "Customers may only cancel their own bookings".into(),
        ));
    }
    Err(AppError::Forbidden("You do not have access to this booking".into()))
}

/// Cancel: brand owner, admin, or the original booker.
pub fn authorize_booking_cancel(user: &User, booking: &Booking, brand: &Brand) -> Result<(), AppError> {
    if user.is_admin() || owns_brand(user, brand) || is_booker(user, booking) {
        Ok(())
    } else {
        Err(AppError::Forbidden("You do not have access to this booking".into()))
    }
}

/// Scoped (non-public) listing: admins see everything; a brand filter
/// requires owning that brand; a user filter must point at the caller.
pub fn authorize_booking_list(
    user: &User,
    brand: Option<&Brand>,
    filter_user_id: Option<&str>,
) -> Result<(), AppError> {
    if user.is_admin() {
        return Ok(());
    }
    if let Some(brand) = brand
        && !owns_brand(user, brand) {
        return Err(AppError::Forbidden("You do not own this brand".into()));
    }
    if let Some(uid) = filter_user_id
        && uid != user.id
        && brand.is_none() {
        return Err(AppError::Forbidden("You may only list your own bookings".into()));
    }
    Ok(())
}
