use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};
use serde::Serialize;

use crate::domain::models::booking::Booking;
use crate::domain::models::product::Product;

/// One day's occupied portion of a booking, as rendered by calendar UIs.
/// Carries no price or customer data.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DayInterval {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub busy: bool,
}

/// Expands bookings into per-calendar-day busy intervals (UTC days).
///
/// A single-day booking yields one interval `[start, end]`. A multi-day
/// booking yields one interval per day it touches: the first day runs to
/// 23:59:59.999, the last starts at 00:00:00.000, days in between are full
/// blocks. Output order is input order, ascending day index per booking.
pub fn project_busy_intervals(bookings: &[Booking]) -> Vec<DayInterval> {
    let mut intervals = Vec::new();

    for booking in bookings {
        let first_day = booking.start_date.date_naive();
        let last_day = booking.end_date.date_naive();

        if first_day == last_day {
            intervals.push(day_interval(&booking.id, 0, booking.start_date, booking.end_date));
            continue;
        }

        let span_days = (last_day - first_day).num_days();
        for idx in 0..=span_days {
            let day = first_day + chrono::Days::new(idx as u64);
            let start = if idx == 0 {
                booking.start_date
            } else {
                day.and_hms_opt(0, 0, 0).unwrap().and_utc()
            };
            let end = if idx == span_days {
                booking.end_date
            } else {
                day.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc()
            };
            intervals.push(day_interval(&booking.id, idx, start, end));
        }
    }

    intervals
}

fn day_interval(booking_id: &str, day_index: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> DayInterval {
    DayInterval {
        id: format!("{}-{}", booking_id, day_index),
        title: "Booked".to_string(),
        start,
        end,
        busy: true,
    }
}

/// Generates an iCalendar (.ics) string for a specific booking
pub fn generate_ics(product: &Product, booking: &Booking) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&product.name)
        .description(&format!("Booking {}", booking.booking_code))
        .starts(booking.start_date)
        .ends(booking.end_date)
        .uid(&booking.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
