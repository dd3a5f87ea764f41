//! Eatery menu passwords and uploaded daily menus

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{EateryMenu, MenuPasswordRequest, VenueKind};
use shared::validation::{MIN_MENU_PASSWORD_LEN, validate_password};

use crate::api::{ApiResult, internal, release_files};
use crate::auth::AdminIdentity;
use crate::db;
use crate::state::AppState;
use crate::util::hash_password;

fn eatery_not_found(id: i64) -> AppError {
    AppError::venue_not_found(VenueKind::Eatery.as_str(), id)
}

/// PUT /api/admin/eateries/{id}/menu-password
pub async fn set_password(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(req): Json<MenuPasswordRequest>,
) -> ApiResult<bool> {
    validate_password(&req.password, MIN_MENU_PASSWORD_LEN)?;
    let hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    if !db::eateries::set_menu_password(&state.pool, id, &hash)
        .await
        .map_err(internal)?
    {
        return Err(eatery_not_found(id));
    }

    tracing::info!(eatery_id = id, admin_id = identity.admin_id, "Menu password set");
    super::audit(&state, &identity, "set_menu_password", "eatery", Some(id), None).await;
    Ok(Json(true))
}

/// DELETE /api/admin/eateries/{id}/menu-password
pub async fn clear_password(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::eateries::clear_menu_password(&state.pool, id)
        .await
        .map_err(internal)?
    {
        return Err(eatery_not_found(id));
    }

    tracing::info!(eatery_id = id, admin_id = identity.admin_id, "Menu password cleared");
    super::audit(&state, &identity, "clear_menu_password", "eatery", Some(id), None).await;
    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct MenuListQuery {
    pub limit: Option<i64>,
}

/// GET /api/admin/eateries/{id}/menus: newest date first
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<MenuListQuery>,
) -> ApiResult<Vec<EateryMenu>> {
    if !db::venues::exists(&state.pool, VenueKind::Eatery, id)
        .await
        .map_err(internal)?
    {
        return Err(eatery_not_found(id));
    }
    let limit = query.limit.unwrap_or(30).clamp(1, 365);
    let menus = db::eatery_menus::list_by_eatery(&state.pool, &state.media, id, limit)
        .await
        .map_err(internal)?;
    Ok(Json(menus))
}

/// DELETE /api/admin/menus/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    let key = db::eatery_menus::delete(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;
    super::audit(&state, &identity, "delete", "eatery_menu", Some(id), None).await;
    release_files(&state, vec![key]);
    Ok(Json(true))
}
