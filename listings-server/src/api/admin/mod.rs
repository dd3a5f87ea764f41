//! Management API (admin JWT)
//!
//! Every write records an audit entry; audit failures are logged and never
//! fail the request.

mod audit;
mod auth;
mod awards;
mod beach_images;
mod bookings;
mod menus;
mod venues;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use serde_json::Value;

use crate::auth::AdminIdentity;
use crate::auth::admin_auth::admin_auth_middleware;
use crate::auth::rate_limit::login_rate_limit;
use crate::db;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/api/admin/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    let protected = Router::new()
        .route("/api/admin/me", get(auth::me))
        .route("/api/admin/password", put(auth::change_password))
        .merge(venues::router())
        .route("/api/admin/media", post(super::media::upload))
        .route(
            "/api/admin/restaurants/{id}/awards",
            get(awards::list).post(awards::create),
        )
        .route(
            "/api/admin/awards/{id}",
            put(awards::update).delete(awards::remove),
        )
        .route(
            "/api/admin/beaches/{id}/images",
            get(beach_images::list).post(beach_images::create),
        )
        .route(
            "/api/admin/beach-images/{id}",
            put(beach_images::update).delete(beach_images::remove),
        )
        .route(
            "/api/admin/eateries/{id}/menu-password",
            put(menus::set_password).delete(menus::clear_password),
        )
        .route("/api/admin/eateries/{id}/menus", get(menus::list))
        .route("/api/admin/menus/{id}", delete(menus::remove))
        .route("/api/admin/bookings", get(bookings::list))
        .route(
            "/api/admin/bookings/{id}",
            get(bookings::get_by_id).delete(bookings::remove),
        )
        .route(
            "/api/admin/bookings/{id}/status",
            axum::routing::patch(bookings::update_status),
        )
        .route("/api/admin/audit", get(audit::list))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    login.merge(protected)
}

/// Record an admin action
pub(crate) async fn audit(
    state: &AppState,
    identity: &AdminIdentity,
    action: &str,
    resource: &str,
    resource_id: Option<i64>,
    detail: Option<Value>,
) {
    if let Err(e) = db::audit::log(
        &state.pool,
        identity.admin_id,
        action,
        resource,
        resource_id,
        detail.as_ref(),
    )
    .await
    {
        tracing::warn!(
            admin_id = identity.admin_id,
            action,
            resource,
            error = %e,
            "Failed to write audit entry"
        );
    }
}
