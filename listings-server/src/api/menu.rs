//! Daily menus of eateries
//!
//! Staff unlock the upload with the eatery's menu password and receive a
//! token scoped to that eatery; uploading again for the same date replaces
//! the previous menu.

use axum::extract::{Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{EateryMenu, MenuPasswordRequest, MenuUnlockResponse, VenueKind};
use shared::validation::{MAX_NOTE_LEN, validate_optional_text};

use super::media::read_form;
use super::{ApiResult, internal, release_files};
use crate::auth::MenuAccess;
use crate::auth::menu_token::create_menu_token;
use crate::auth::rate_limit::menu_unlock_rate_limit;
use crate::db;
use crate::db::eatery_menus::NewMenu;
use crate::state::AppState;
use crate::storage::MediaCategory;
use crate::util::verify_password;

pub fn router(state: &AppState) -> Router<AppState> {
    let unlock = Router::new()
        .route("/api/eateries/{id}/menu/unlock", post(unlock))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            menu_unlock_rate_limit,
        ));

    Router::new()
        .route("/api/eateries/{id}/menu/today", get(today))
        .route("/api/eateries/{id}/menu", post(upload))
        .merge(unlock)
}

/// GET /api/eateries/{id}/menu/today
pub async fn today(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<EateryMenu> {
    if !db::venues::exists_active(&state.pool, VenueKind::Eatery, id)
        .await
        .map_err(internal)?
    {
        return Err(AppError::venue_not_found(VenueKind::Eatery.as_str(), id));
    }

    let date = shared::time::today(state.timezone())
        .format("%Y-%m-%d")
        .to_string();
    let menu = db::eatery_menus::for_date(&state.pool, &state.media, id, &date)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound).with_detail("date", date))?;
    Ok(Json(menu))
}

/// POST /api/eateries/{id}/menu/unlock
pub async fn unlock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<MenuPasswordRequest>,
) -> ApiResult<MenuUnlockResponse> {
    let hash = db::eateries::menu_password_hash(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::venue_not_found(VenueKind::Eatery.as_str(), id))?
        .ok_or_else(|| AppError::new(ErrorCode::MenuPasswordNotSet))?;

    if !verify_password(&req.password, &hash) {
        tracing::warn!(eatery_id = id, "Menu unlock with wrong password");
        return Err(AppError::new(ErrorCode::MenuPasswordInvalid));
    }

    let (token, expires_in) = create_menu_token(id, &hash, &state.jwt_secret).map_err(|e| {
        tracing::error!("Menu token creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    tracing::info!(eatery_id = id, "Menu upload unlocked");
    Ok(Json(MenuUnlockResponse { token, expires_in }))
}

/// POST /api/eateries/{id}/menu: multipart `file`, optional `date`, `notes`
pub async fn upload(
    State(state): State<AppState>,
    access: MenuAccess,
    multipart: Multipart,
) -> ApiResult<EateryMenu> {
    let eatery_id = access.eatery_id;
    let stored_hash = db::eateries::menu_password_hash(&state.pool, eatery_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::venue_not_found(VenueKind::Eatery.as_str(), eatery_id))?;
    access.ensure_current(stored_hash.as_deref())?;

    let form = read_form(multipart).await?;

    let menu_date = requested_menu_date(form.field("date"), state.timezone())?
        .format("%Y-%m-%d")
        .to_string();
    let notes = form.field("notes").map(str::to_string);
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;

    let eatery_name = db::venues::active_name(&state.pool, VenueKind::Eatery, eatery_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::venue_not_found(VenueKind::Eatery.as_str(), eatery_id))?;

    let stored = state
        .storage
        .store_document(MediaCategory::Menus, form.data, &form.filename)
        .await?;

    let (menu, replaced) = db::eatery_menus::upsert(
        &state.pool,
        &state.media,
        &NewMenu {
            eatery_id,
            menu_date: &menu_date,
            file_key: &stored.key,
            content_type: &stored.content_type,
            notes: notes.as_deref(),
            now: shared::util::now_millis(),
        },
    )
    .await
    .map_err(internal)?;

    if let Some(old_key) = replaced {
        release_files(&state, vec![old_key]);
    }

    tracing::info!(
        eatery_id,
        menu_date = %menu.menu_date,
        key = %stored.key,
        "Daily menu uploaded"
    );

    let email = state.email.clone();
    let url = menu.url.clone();
    tokio::spawn(async move {
        email.send_menu_uploaded(&eatery_name, &menu_date, &url).await;
    });

    Ok(Json(menu))
}

/// Requested menu date, defaulting to today; never before today
fn requested_menu_date(raw: Option<&str>, tz: Tz) -> AppResult<NaiveDate> {
    match raw {
        Some(raw) => {
            let date = shared::time::parse_date(raw)?;
            shared::time::validate_not_past(date, tz, ErrorCode::MenuDateInPast)?;
            Ok(date)
        }
        None => Ok(shared::time::today(tz)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_menu_date() {
        let tz = chrono_tz::Europe::Madrid;
        assert_eq!(requested_menu_date(None, tz).unwrap(), shared::time::today(tz));
        assert_eq!(
            requested_menu_date(Some("2099-03-01"), tz).unwrap(),
            NaiveDate::from_ymd_opt(2099, 3, 1).unwrap()
        );

        let err = requested_menu_date(Some("2001-03-01"), tz).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuDateInPast);

        let err = requested_menu_date(Some("tomorrow"), tz).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
