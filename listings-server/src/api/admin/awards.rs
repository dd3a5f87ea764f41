//! Restaurant awards

use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::error::{AppError, ErrorCode};
use shared::models::{Award, AwardCreate, AwardUpdate, VenueKind};

use crate::api::{ApiResult, internal, release_files};
use crate::auth::AdminIdentity;
use crate::db;
use crate::state::AppState;

const RESOURCE: &str = "award";

fn award_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::AwardNotFound, format!("Award {id} not found"))
}

async fn require_restaurant(state: &AppState, restaurant_id: i64) -> Result<(), AppError> {
    if db::venues::exists(&state.pool, VenueKind::Restaurant, restaurant_id)
        .await
        .map_err(internal)?
    {
        Ok(())
    } else {
        Err(AppError::venue_not_found(
            VenueKind::Restaurant.as_str(),
            restaurant_id,
        ))
    }
}

/// GET /api/admin/restaurants/{id}/awards
pub async fn list(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> ApiResult<Vec<Award>> {
    require_restaurant(&state, restaurant_id).await?;
    let awards = db::awards::list_by_restaurant(&state.pool, &state.media, restaurant_id)
        .await
        .map_err(internal)?;
    Ok(Json(awards))
}

/// POST /api/admin/restaurants/{id}/awards
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<AwardCreate>,
) -> ApiResult<Award> {
    data.validate()?;
    require_restaurant(&state, restaurant_id).await?;

    let award = db::awards::create(&state.pool, &state.media, restaurant_id, &data)
        .await
        .map_err(internal)?;
    super::audit(&state, &identity, "create", RESOURCE, Some(award.id), None).await;
    Ok(Json(award))
}

/// PUT /api/admin/awards/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(data): Json<AwardUpdate>,
) -> ApiResult<Award> {
    data.validate()?;
    let award = db::awards::update(&state.pool, &state.media, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| award_not_found(id))?;
    super::audit(&state, &identity, "update", RESOURCE, Some(id), None).await;
    Ok(Json(award))
}

/// DELETE /api/admin/awards/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    let keys = db::awards::delete(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| award_not_found(id))?;
    super::audit(&state, &identity, "delete", RESOURCE, Some(id), None).await;
    release_files(&state, keys);
    Ok(Json(true))
}
