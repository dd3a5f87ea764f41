//! Beach photo gallery

use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::error::{AppError, ErrorCode};
use shared::models::{BeachImage, BeachImageCreate, BeachImageUpdate, VenueKind};

use crate::api::{ApiResult, internal, release_files};
use crate::auth::AdminIdentity;
use crate::db;
use crate::state::AppState;

const RESOURCE: &str = "beach_image";

fn image_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::BeachImageNotFound,
        format!("Beach image {id} not found"),
    )
}

async fn require_beach(state: &AppState, beach_id: i64) -> Result<(), AppError> {
    if !db::venues::exists(&state.pool, VenueKind::Beach, beach_id)
        .await
        .map_err(internal)?
    {
        return Err(AppError::venue_not_found(VenueKind::Beach.as_str(), beach_id));
    }
    Ok(())
}

/// GET /api/admin/beaches/{id}/images
pub async fn list(
    State(state): State<AppState>,
    Path(beach_id): Path<i64>,
) -> ApiResult<Vec<BeachImage>> {
    require_beach(&state, beach_id).await?;
    let images = db::beach_images::list_by_beach(&state.pool, &state.media, beach_id)
        .await
        .map_err(internal)?;
    Ok(Json(images))
}

/// POST /api/admin/beaches/{id}/images
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(beach_id): Path<i64>,
    Json(data): Json<BeachImageCreate>,
) -> ApiResult<BeachImage> {
    data.validate()?;
    require_beach(&state, beach_id).await?;

    let image = db::beach_images::add(&state.pool, &state.media, beach_id, &data)
        .await
        .map_err(internal)?;
    super::audit(&state, &identity, "create", RESOURCE, Some(image.id), None).await;
    Ok(Json(image))
}

/// PUT /api/admin/beach-images/{id}: caption and order only
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(data): Json<BeachImageUpdate>,
) -> ApiResult<BeachImage> {
    data.validate()?;
    let image = db::beach_images::update(&state.pool, &state.media, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| image_not_found(id))?;
    super::audit(&state, &identity, "update", RESOURCE, Some(id), None).await;
    Ok(Json(image))
}

/// DELETE /api/admin/beach-images/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    let keys = db::beach_images::delete(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| image_not_found(id))?;
    super::audit(&state, &identity, "delete", RESOURCE, Some(id), None).await;
    release_files(&state, keys);
    Ok(Json(true))
}
