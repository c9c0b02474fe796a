use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Datelike, Utc};
use sqlx::FromRow;
use rand::Rng;

/// Charset for the random tail of a booking code: base-36, uppercase.
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    /// PENDING -> {CONFIRMED, CANCELLED}; CONFIRMED -> {COMPLETED, CANCELLED};
    /// CANCELLED and COMPLETED are terminal. Re-asserting the current status
    /// is a no-op and always allowed, which makes cancellation idempotent.
    pub fn can_transition_to(&self, next: Self) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_uppercase().as_str() {
            "UNPAID" => Some(Self::Unpaid),
            "PAID" => Some(Self::Paid),
            "REFUNDED" => Some(Self::Refunded),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "UNPAID",
            Self::Paid => "PAID",
            Self::Refunded => "REFUNDED",
        }
    }

    /// UNPAID -> PAID -> REFUNDED, no way back. Same-state is a no-op.
    pub fn can_transition_to(&self, next: Self) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::Unpaid, Self::Paid) | (Self::Paid, Self::Refunded)
        )
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub booking_code: String,
    pub product_id: String,
    pub brand_id: String,
    pub user_id: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_org: Option<String>,
    pub notes: Option<String>,
    pub total_price: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub booking_code: String,
    pub product_id: String,
    pub brand_id: String,
    pub user_id: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_org: Option<String>,
    pub notes: Option<String>,
    pub total_price: i64,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_code: params.booking_code,
            product_id: params.product_id,
            brand_id: params.brand_id,
            user_id: params.user_id,
            start_date: params.start_date,
            end_date: params.end_date,
            customer_name: params.customer_name,
            customer_phone: params.customer_phone,
            customer_email: params.customer_email,
            customer_org: params.customer_org,
            notes: params.notes,
            total_price: params.total_price,
            status: BookingStatus::Pending.as_str().to_string(),
            payment_status: PaymentStatus::Unpaid.as_str().to_string(),
            payment_method: None,
            created_at: Utc::now(),
        }
    }

    /// `BK` + 2-digit year + 2-digit month + 6 random base-36 chars,
    /// e.g. `BK2601A7K2QX`. The format is user-facing and persisted.
    pub fn generate_code(now: DateTime<Utc>) -> String {
        let mut rng = rand::thread_rng();
        let tail: String = (0..6)
            .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
            .collect();
        format!("BK{:02}{:02}{}", now.year() % 100, now.month(), tail)
    }

    pub fn status(&self) -> Option<BookingStatus> {
        BookingStatus::parse(&self.status)
    }

    pub fn payment_status(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.payment_status)
    }
}

/// PII-free projection returned to calendar viewers regardless of identity.
#[derive(Debug, Serialize, Clone)]
pub struct PublicBooking {
    pub id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
    pub product_id: String,
}

impl From<&Booking> for PublicBooking {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id.clone(),
            start_date: b.start_date,
            end_date: b.end_date,
            status: b.status.clone(),
            product_id: b.product_id.clone(),
        }
    }
}
