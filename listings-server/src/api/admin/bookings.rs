//! Booking administration

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Booking, BookingListQuery, BookingStatus, BookingStatusUpdate};

use crate::api::{ApiResult, internal};
use crate::auth::AdminIdentity;
use crate::db;
use crate::state::AppState;

const RESOURCE: &str = "booking";

fn booking_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::BookingNotFound, format!("Booking {id} not found"))
}

fn invalid_transition(id: i64, from: BookingStatus, to: BookingStatus) -> AppError {
    AppError::with_message(
        ErrorCode::BookingInvalidTransition,
        format!("Booking {id} cannot move from {from} to {to}"),
    )
    .with_detail("from", from.as_str())
    .with_detail("to", to.as_str())
}

/// GET /api/admin/bookings
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<Vec<Booking>> {
    if let Some(date) = &query.date {
        shared::time::parse_date(date)?;
    }
    let bookings = db::bookings::list(&state.pool, &query)
        .await
        .map_err(internal)?;
    Ok(Json(bookings))
}

/// GET /api/admin/bookings/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Booking> {
    let booking = db::bookings::get(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| booking_not_found(id))?;
    Ok(Json(booking))
}

/// DELETE /api/admin/bookings/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::bookings::delete(&state.pool, id).await.map_err(internal)? {
        return Err(booking_not_found(id));
    }
    super::audit(&state, &identity, "delete", RESOURCE, Some(id), None).await;
    Ok(Json(true))
}

/// PATCH /api/admin/bookings/{id}/status
///
/// pending → confirmed | cancelled, confirmed → cancelled. The guest is
/// emailed about the change.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(req): Json<BookingStatusUpdate>,
) -> ApiResult<Booking> {
    let current = db::bookings::get(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| booking_not_found(id))?;

    let from = current.status;
    let to = req.status;
    if !from.can_transition_to(to) {
        return Err(invalid_transition(id, from, to));
    }

    let booking = match db::bookings::update_status(&state.pool, id, from, to)
        .await
        .map_err(internal)?
    {
        Some(b) => b,
        // Changed or deleted since we read it
        None => {
            return match db::bookings::get(&state.pool, id).await.map_err(internal)? {
                Some(latest) => Err(invalid_transition(id, latest.status, to)),
                None => Err(booking_not_found(id)),
            };
        }
    };

    tracing::info!(
        booking_id = id,
        from = %from,
        to = %to,
        admin_id = identity.admin_id,
        "Booking status changed"
    );
    super::audit(
        &state,
        &identity,
        "update_status",
        RESOURCE,
        Some(id),
        Some(json!({ "from": from.as_str(), "to": to.as_str() })),
    )
    .await;

    let venue_name = match db::venues::notification_target(&state.pool, booking.venue_kind, booking.venue_id).await {
        Ok(Some(target)) => target.name,
        Ok(None) => booking.venue_kind.label().to_string(),
        Err(e) => {
            tracing::warn!(booking_id = id, error = %e, "Venue lookup for status email failed");
            booking.venue_kind.label().to_string()
        }
    };
    let email = state.email.clone();
    let notified = booking.clone();
    tokio::spawn(async move {
        email.send_booking_status(&notified, &venue_name).await;
    });

    Ok(Json(booking))
}
