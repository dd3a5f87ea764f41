//! Public booking requests
//!
//! POST /api/bookings: validated, checked against the target venue, stored
//! as `pending`; the guest and the venue are emailed in the background.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router, middleware};
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Booking, BookingCreate};

use super::{ApiResult, internal};
use crate::auth::rate_limit::booking_rate_limit;
use crate::db;
use crate::db::bookings::NewBooking;
use crate::db::venues::VenueTarget;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            booking_rate_limit,
        ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<BookingCreate>,
) -> ApiResult<Booking> {
    req.validate()?;
    let (date, time) = booking_slot(&req, state.timezone())?;

    let kind = req.venue_kind;
    let target = db::venues::notification_target(&state.pool, kind, req.venue_id)
        .await
        .map_err(internal)?
        .filter(|t| t.is_active)
        .ok_or_else(|| AppError::venue_not_found(kind.as_str(), req.venue_id))?;
    check_accepts_bookings(&target, kind.label(), shared::util::now_millis())?;

    let booking_date = date.format("%Y-%m-%d").to_string();
    let booking_time = time.map(|t| t.format("%H:%M").to_string());
    let booking = db::bookings::create(
        &state.pool,
        &NewBooking {
            venue_kind: kind,
            venue_id: req.venue_id,
            guest_name: req.guest_name.trim(),
            guest_email: req.guest_email.trim(),
            guest_phone: trimmed(req.guest_phone.as_deref()),
            booking_date: &booking_date,
            booking_time: booking_time.as_deref(),
            party_size: req.party_size,
            notes: trimmed(req.notes.as_deref()),
        },
    )
    .await
    .map_err(internal)?;

    tracing::info!(
        booking_id = booking.id,
        venue_kind = %kind,
        venue_id = booking.venue_id,
        date = %booking.booking_date,
        party_size = booking.party_size,
        "Booking created"
    );

    let email = state.email.clone();
    let inbox = target
        .email
        .clone()
        .filter(|e| !e.trim().is_empty())
        .or_else(|| email.notify_email().map(str::to_string));
    let venue_name = target.name;
    let notified = booking.clone();
    tokio::spawn(async move {
        email.send_booking_received(&notified, &venue_name).await;
        match inbox {
            Some(to) => {
                email
                    .send_booking_notification(&to, &notified, &venue_name)
                    .await
            }
            None => tracing::warn!(
                booking_id = notified.id,
                "No inbox for booking notification"
            ),
        }
    });

    Ok(Json(booking))
}

/// Parse date and optional time; neither may lie in the past (venue timezone)
fn booking_slot(req: &BookingCreate, tz: Tz) -> AppResult<(NaiveDate, Option<NaiveTime>)> {
    let date = shared::time::parse_date(&req.booking_date)?;
    shared::time::validate_not_past(date, tz, ErrorCode::BookingDateInPast)?;

    let time = trimmed(req.booking_time.as_deref())
        .map(shared::time::parse_time)
        .transpose()?;

    if let Some(time) = time {
        let now = shared::time::local_now(tz);
        if date.and_time(time) < now {
            return Err(AppError::with_message(
                ErrorCode::BookingDateInPast,
                format!("{} {} is in the past", date, time.format("%H:%M")),
            ));
        }
    }
    Ok((date, time))
}

fn check_accepts_bookings(target: &VenueTarget, label: &str, now: i64) -> AppResult<()> {
    if !target.accepts_bookings {
        return Err(AppError::with_message(
            ErrorCode::BookingNotAccepted,
            format!("{label} '{}' does not accept bookings", target.name),
        ));
    }
    if let Some(end) = target.event_end
        && end < now
    {
        return Err(AppError::with_message(
            ErrorCode::EventEnded,
            format!("Event '{}' has already ended", target.name),
        ));
    }
    Ok(())
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::VenueKind;

    fn request(date: &str, time: Option<&str>) -> BookingCreate {
        serde_json::from_value(json!({
            "venue_kind": "restaurant",
            "venue_id": 1,
            "guest_name": "Ana",
            "guest_email": "ana@example.com",
            "booking_date": date,
            "booking_time": time,
            "party_size": 2
        }))
        .unwrap()
    }

    fn target(accepts_bookings: bool, event_end: Option<i64>) -> VenueTarget {
        VenueTarget {
            name: "Casa Pepe".into(),
            email: None,
            is_active: true,
            accepts_bookings,
            event_end,
        }
    }

    #[test]
    fn test_booking_slot() {
        let tz = chrono_tz::Europe::Madrid;
        let (date, time) = booking_slot(&request("2099-08-01", Some(" 21:30 ")), tz).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2099, 8, 1).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(21, 30, 0));

        let (_, time) = booking_slot(&request("2099-08-01", Some("")), tz).unwrap();
        assert!(time.is_none());

        let err = booking_slot(&request("2001-01-01", None), tz).unwrap_err();
        assert_eq!(err.code, ErrorCode::BookingDateInPast);

        let err = booking_slot(&request("2099-08-01", Some("25:00")), tz).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = booking_slot(&request("01/08/2099", None), tz).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_check_accepts_bookings() {
        let label = VenueKind::Restaurant.label();
        assert!(check_accepts_bookings(&target(true, None), label, 1_000).is_ok());
        assert_eq!(
            check_accepts_bookings(&target(false, None), label, 1_000)
                .unwrap_err()
                .code,
            ErrorCode::BookingNotAccepted
        );
        assert!(check_accepts_bookings(&target(true, Some(2_000)), label, 1_000).is_ok());
        assert_eq!(
            check_accepts_bookings(&target(true, Some(500)), label, 1_000)
                .unwrap_err()
                .code,
            ErrorCode::EventEnded
        );
    }
}
