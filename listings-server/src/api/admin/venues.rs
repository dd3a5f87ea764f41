//! Venue CRUD for every kind: `/api/admin/{kind}` and `/api/admin/{kind}/{id}`

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use shared::error::AppError;
use shared::models::VenueListQuery;

use crate::api::{ApiResult, internal, release_files};
use crate::auth::AdminIdentity;
use crate::db::VenueStore;
use crate::db::beaches::Beaches;
use crate::db::eateries::Eateries;
use crate::db::events::Events;
use crate::db::gyms::Gyms;
use crate::db::restaurants::Restaurants;
use crate::db::spas::Spas;
use crate::db::swimming_pools::SwimmingPools;
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
    let base = format!("/api/admin/{}", S::KIND.path_segment());
    Router::new()
        .route(&base, get(list::<S>).post(create::<S>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_by_id::<S>).put(update::<S>).delete(remove::<S>),
        )
}

/// Inactive venues only with `include_inactive=true`
async fn list<S: VenueStore>(
    State(state): State<AppState>,
    Query(query): Query<VenueListQuery>,
) -> ApiResult<Vec<S::Model>> {
    let venues = S::list(&state.pool, &state.media, &query)
        .await
        .map_err(internal)?;
    Ok(Json(venues))
}

async fn get_by_id<S: VenueStore>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<S::Model> {
    let venue = S::get(&state.pool, &state.media, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::venue_not_found(S::KIND.as_str(), id))?;
    Ok(Json(venue))
}

async fn create<S: VenueStore>(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(data): Json<S::Create>,
) -> ApiResult<S::Model> {
    S::validate_create(&data)?;
    let venue = S::create(&state.pool, &state.media, &data)
        .await
        .map_err(internal)?;
    let id = S::id(&venue);

    tracing::info!(kind = %S::KIND, venue_id = id, admin_id = identity.admin_id, "Venue created");
    super::audit(&state, &identity, "create", S::KIND.as_str(), Some(id), None).await;
    Ok(Json(venue))
}

async fn update<S: VenueStore>(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(data): Json<S::Update>,
) -> ApiResult<S::Model> {
    S::validate_update(&data)?;
    let venue = S::update(&state.pool, &state.media, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::venue_not_found(S::KIND.as_str(), id))?;

    super::audit(&state, &identity, "update", S::KIND.as_str(), Some(id), None).await;
    Ok(Json(venue))
}

/// Children go with the venue; their files are released once unreferenced
async fn remove<S: VenueStore>(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    let keys = S::delete(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::venue_not_found(S::KIND.as_str(), id))?;

    tracing::info!(
        kind = %S::KIND,
        venue_id = id,
        admin_id = identity.admin_id,
        files = keys.len(),
        "Venue deleted"
    );
    super::audit(
        &state,
        &identity,
        "delete",
        S::KIND.as_str(),
        Some(id),
        Some(json!({ "files": keys.len() })),
    )
    .await;
    release_files(&state, keys);
    Ok(Json(true))
}
