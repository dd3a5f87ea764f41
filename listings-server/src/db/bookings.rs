//! Booking database operations

use shared::models::{Booking, BookingListQuery, BookingStatus, VenueKind};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, QueryBuilder};

use super::BoxError;

const COLUMNS: &str = "id, venue_kind, venue_id, guest_name, guest_email, guest_phone, \
     booking_date, booking_time, party_size, notes, status, created_at, updated_at";

/// Validated booking values (date `YYYY-MM-DD`, time `HH:MM`)
pub struct NewBooking<'a> {
    pub venue_kind: VenueKind,
    pub venue_id: i64,
    pub guest_name: &'a str,
    pub guest_email: &'a str,
    pub guest_phone: Option<&'a str>,
    pub booking_date: &'a str,
    pub booking_time: Option<&'a str>,
    pub party_size: i32,
    pub notes: Option<&'a str>,
}

/// New bookings start as `pending`
pub async fn create(pool: &PgPool, booking: &NewBooking<'_>) -> Result<Booking, BoxError> {
    let sql = format!(
        r#"
        INSERT INTO bookings (
            id, venue_kind, venue_id, guest_name, guest_email, guest_phone,
            booking_date, booking_time, party_size, notes, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        RETURNING {COLUMNS}
        "#
    );
    let row: Booking = sqlx::query_as(&sql)
        .bind(snowflake_id())
        .bind(booking.venue_kind.as_str())
        .bind(booking.venue_id)
        .bind(booking.guest_name)
        .bind(booking.guest_email)
        .bind(booking.guest_phone)
        .bind(booking.booking_date)
        .bind(booking.booking_time)
        .bind(booking.party_size)
        .bind(booking.notes)
        .bind(BookingStatus::Pending.as_str())
        .bind(now_millis())
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Booking>, BoxError> {
    let sql = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
    let row: Option<Booking> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

/// Newest booking date first
pub async fn list(pool: &PgPool, query: &BookingListQuery) -> Result<Vec<Booking>, BoxError> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM bookings WHERE TRUE"));
    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(kind) = query.venue_kind {
        qb.push(" AND venue_kind = ").push_bind(kind.as_str());
    }
    if let Some(venue_id) = query.venue_id {
        qb.push(" AND venue_id = ").push_bind(venue_id);
    }
    if let Some(date) = &query.date {
        qb.push(" AND booking_date = ").push_bind(date.clone());
    }
    qb.push(" ORDER BY booking_date DESC, booking_time DESC NULLS LAST, id DESC LIMIT ")
        .push_bind(query.limit.unwrap_or(50).clamp(1, 200))
        .push(" OFFSET ")
        .push_bind(query.offset.unwrap_or(0).max(0));

    let rows: Vec<Booking> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

/// Move `from` → `to`. `None` when the booking is gone or its status
/// changed concurrently (the caller re-reads to tell which).
pub async fn update_status(
    pool: &PgPool,
    id: i64,
    from: BookingStatus,
    to: BookingStatus,
) -> Result<Option<Booking>, BoxError> {
    let sql = format!(
        r#"
        UPDATE bookings SET status = $3, updated_at = $4
        WHERE id = $1 AND status = $2
        RETURNING {COLUMNS}
        "#
    );
    let row: Option<Booking> = sqlx::query_as(&sql)
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(now_millis())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
