//! Public venue catalogue
//!
//! One set of generic handlers serves every venue kind:
//!
//! - `GET /api/{kind}`             active venues (`?city=&search=&limit=&offset=`)
//! - `GET /api/{kind}/{id}`        detail (inactive venues are 404)
//! - `GET /api/{kind}/{id}/status` open / closing soon / closed right now

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use shared::error::AppError;
use shared::hours::OpenStatus;
use shared::models::VenueListQuery;

use super::{ApiResult, internal};
use crate::db::VenueStore;
use crate::db::beaches::Beaches;
use crate::db::eateries::Eateries;
use crate::db::events::Events;
use crate::db::gyms::Gyms;
use crate::db::restaurants::Restaurants;
use crate::db::spas::Spas;
use crate::db::swimming_pools::SwimmingPools;
use crate::db::{self, venue};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(kind_routes::<Restaurants>())
        .merge(kind_routes::<Eateries>())
        .merge(kind_routes::<Beaches>())
        .merge(kind_routes::<Gyms>())
        .merge(kind_routes::<Spas>())
        .merge(kind_routes::<SwimmingPools>())
        .merge(kind_routes::<Events>())
}

fn kind_routes<S: VenueStore>() -> Router<AppState> {
    let base = format!("/api/{}", S::KIND.path_segment());
    let mut router = Router::new()
        .route(&base, get(list::<S>))
        .route(&format!("{base}/{{id}}"), get(get_by_id::<S>));
    if S::KIND.has_opening_hours() {
        router = router.route(&format!("{base}/{{id}}/status"), get(status::<S>));
    }
    router
}

pub async fn list<S: VenueStore>(
    State(state): State<AppState>,
    Query(mut query): Query<VenueListQuery>,
) -> ApiResult<Vec<S::Model>> {
    query.include_inactive = false;
    let venues = S::list(&state.pool, &state.media, &query)
        .await
        .map_err(internal)?;
    Ok(Json(venues))
}

pub async fn get_by_id<S: VenueStore>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<S::Model> {
    let venue = S::get(&state.pool, &state.media, id)
        .await
        .map_err(internal)?
        .filter(|v| S::is_active(v))
        .ok_or_else(|| AppError::venue_not_found(S::KIND.as_str(), id))?;
    Ok(Json(venue))
}

/// `null` when the venue publishes no (readable) schedule
pub async fn status<S: VenueStore>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Option<OpenStatus>> {
    let hours = db::venues::opening_hours(&state.pool, S::KIND, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::venue_not_found(S::KIND.as_str(), id))?;
    let status = open_status(id, hours.as_ref(), &state);
    Ok(Json(status))
}

fn open_status(venue_id: i64, hours: Option<&Value>, state: &AppState) -> Option<OpenStatus> {
    let schedule = venue::parse_hours(venue_id, hours?)?;
    Some(schedule.status_now(state.timezone()))
}
