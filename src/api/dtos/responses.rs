use chrono::{DateTime, Utc};
use serde::Serialize;

/// Sanitized reference to the booking blocking a requested range.
#[derive(Serialize)]
pub struct ConflictingBookingRef {
    pub id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_booking: Option<ConflictingBookingRef>,
}
