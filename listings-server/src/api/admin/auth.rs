//! Admin login and account endpoints

use axum::extract::State;
use axum::{Extension, Json};
use shared::error::{AppError, ErrorCode};
use shared::models::{Admin, ChangePasswordRequest, LoginRequest, LoginResponse};
use shared::validation::{MIN_ADMIN_PASSWORD_LEN, validate_password};

use crate::api::{ApiResult, internal};
use crate::auth::AdminIdentity;
use crate::auth::admin_auth::create_token;
use crate::db;
use crate::state::AppState;
use crate::util::{hash_password, verify_password, verify_password_dummy};

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let Some(admin) = db::admins::find_by_email(&state.pool, &req.email)
        .await
        .map_err(internal)?
    else {
        verify_password_dummy(&req.password);
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(&req.password, &admin.password_hash) {
        tracing::warn!(admin_id = admin.id, "Admin login with wrong password");
        return Err(AppError::invalid_credentials());
    }

    let token = create_token(admin.id, &admin.email, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let identity = AdminIdentity {
        admin_id: admin.id,
        email: admin.email,
    };
    super::audit(&state, &identity, "login", "admin", Some(admin.id), None).await;

    Ok(Json(LoginResponse {
        token,
        admin_id: admin.id,
    }))
}

/// GET /api/admin/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> ApiResult<Admin> {
    let admin = db::admins::find_by_id(&state.pool, identity.admin_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Admin"))?;
    Ok(Json(admin))
}

/// PUT /api/admin/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<bool> {
    validate_password(&req.new_password, MIN_ADMIN_PASSWORD_LEN)?;

    let current_hash = db::admins::password_hash(&state.pool, identity.admin_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Admin"))?;
    if !verify_password(&req.current_password, &current_hash) {
        return Err(AppError::invalid_credentials());
    }

    let new_hash = hash_password(&req.new_password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    db::admins::update_password(&state.pool, identity.admin_id, &new_hash)
        .await
        .map_err(internal)?;

    super::audit(
        &state,
        &identity,
        "change_password",
        "admin",
        Some(identity.admin_id),
        None,
    )
    .await;

    Ok(Json(true))
}
