//! API routes for listings-server

pub mod admin;
pub mod bookings;
pub mod health;
pub mod media;
pub mod menu;
pub mod venues;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use http::{HeaderValue, Method, header};
use shared::error::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::BoxError;
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::storage::{LocalStorage, MAX_FILE_SIZE};

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Multipart overhead on top of the largest accepted file
const MAX_BODY_SIZE: usize = MAX_FILE_SIZE + 2 * 1024 * 1024;

/// Create the combined router
pub fn create_router(state: AppState, config: &Config) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .merge(venues::router())
        .merge(menu::router(&state))
        .merge(bookings::router(&state))
        .merge(media::router());

    Router::new()
        .merge(public)
        .merge(admin::router(&state))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(CompressionLayer::new())
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Explicit origins when configured; permissive in development, same-origin otherwise
fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allowed_origins.is_empty() {
        if config.is_development() {
            return CorsLayer::permissive();
        }
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Map a repository error onto the API error (business errors pass through)
pub(crate) fn internal(e: BoxError) -> AppError {
    ServiceError::Db(e).into()
}

/// How long a released file survives before the reference check.
///
/// Keys are content-addressed, so a fresh upload of identical bytes returns a
/// key that may be queued for removal; the uploader has this long to attach it
/// to a row. Releases still pending at shutdown are dropped and leave the file
/// on disk.
pub(crate) const RELEASE_GRACE: Duration = Duration::from_secs(10 * 60);

/// Delete stored files no row references any more.
///
/// Runs in the background; the response never waits on disk cleanup.
pub(crate) fn release_files(state: &AppState, keys: Vec<String>) {
    if keys.is_empty() {
        return;
    }
    let pool = state.pool.clone();
    let storage = state.storage.clone();
    tokio::spawn(async move {
        release_unreferenced(&storage, keys, RELEASE_GRACE, |key| {
            let pool = pool.clone();
            async move { db::venues::key_in_use(&pool, &key).await }
        })
        .await;
    });
}

/// Wait `grace`, then remove every key `in_use` reports as unreferenced
pub(crate) async fn release_unreferenced<F, Fut>(
    storage: &LocalStorage,
    keys: Vec<String>,
    grace: Duration,
    in_use: F,
) where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<bool, BoxError>>,
{
    tokio::time::sleep(grace).await;
    for key in keys {
        match in_use(key.clone()).await {
            Ok(false) => storage.remove(&key).await,
            Ok(true) => tracing::debug!(key = %key, "Media file still referenced, keeping"),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Reference check failed, keeping media file")
            }
        }
    }
}
