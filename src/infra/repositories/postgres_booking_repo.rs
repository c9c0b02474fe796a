use crate::domain::{models::booking::Booking, ports::{BookingFilter, BookingRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use chrono::{DateTime, Utc};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_if_available(&self, booking: &Booking) -> Result<Option<Booking>, AppError> {
        // Guarded insert closes the common case; the bookings_no_overlap
        // exclusion constraint catches the READ COMMITTED race between two
        // writers that both pass NOT EXISTS (surfaces as SQLSTATE 23P01).
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, booking_code, product_id, brand_id, user_id, start_date, end_date, customer_name, customer_phone, customer_email, customer_org, notes, total_price, status, payment_status, payment_method, created_at)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17
             WHERE NOT EXISTS (
                 SELECT 1 FROM bookings
                 WHERE product_id = $3 AND status IN ('PENDING', 'CONFIRMED')
                   AND start_date <= $7 AND end_date >= $6
             )
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.booking_code).bind(&booking.product_id).bind(&booking.brand_id)
            .bind(&booking.user_id).bind(booking.start_date).bind(booking.end_date)
            .bind(&booking.customer_name).bind(&booking.customer_phone).bind(&booking.customer_email)
            .bind(&booking.customer_org).bind(&booking.notes).bind(booking.total_price)
            .bind(&booking.status).bind(&booking.payment_status).bind(&booking.payment_method)
            .bind(booking.created_at)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_code = $1")
            .bind(code).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_conflict(
        &self,
        product_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<&str>,
    ) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings
             WHERE product_id = $1 AND status IN ('PENDING', 'CONFIRMED')
               AND start_date <= $2 AND end_date >= $3
               AND ($4::text IS NULL OR id != $4)
             ORDER BY start_date ASC LIMIT 1"
        )
            .bind(product_id).bind(end).bind(start).bind(exclude_booking_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM bookings WHERE 1=1");
        if let Some(product_id) = &filter.product_id {
            qb.push(" AND product_id = ").push_bind(product_id);
        }
        if let Some(brand_id) = &filter.brand_id {
            qb.push(" AND brand_id = ").push_bind(brand_id);
        }
        if let Some(user_id) = &filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(statuses) = &filter.statuses
            && !statuses.is_empty() {
            qb.push(" AND status IN (");
            let mut separated = qb.separated(", ");
            for status in statuses {
                separated.push_bind(status);
            }
            qb.push(")");
        }
        if let Some(end) = filter.end_date {
            qb.push(" AND start_date <= ").push_bind(end);
        }
        if let Some(start) = filter.start_date {
            qb.push(" AND end_date >= ").push_bind(start);
        }
        qb.push(" ORDER BY start_date ASC LIMIT ").push_bind(filter.limit);
        qb.push(" OFFSET ").push_bind(filter.offset);

        qb.build_query_as::<Booking>().fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_by_product(&self, product_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE product_id = $1 AND status IN ('PENDING', 'CONFIRMED') ORDER BY start_date ASC"
        )
            .bind(product_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status=$1, payment_status=$2, payment_method=$3, notes=$4
             WHERE id=$5
             RETURNING *"
        )
            .bind(&booking.status).bind(&booking.payment_status)
            .bind(&booking.payment_method).bind(&booking.notes)
            .bind(&booking.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = 'CANCELLED' WHERE id = $1 RETURNING *")
            .bind(&booking.id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
