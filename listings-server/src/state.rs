//! Application state

use std::sync::Arc;

use chrono_tz::Tz;
use sqlx::PgPool;

use crate::BoxError;
use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::db::MediaContext;
use crate::email::EmailService;
use crate::storage::LocalStorage;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for admin and menu tokens
    pub jwt_secret: Arc<str>,
    /// Public URL base and timezone used when rendering venue rows
    pub media: MediaContext,
    /// Uploaded files under MEDIA_DIR
    pub storage: LocalStorage,
    /// Booking and menu notifications
    pub email: EmailService,
    /// Rate limiter for login, menu unlock and booking routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect to PostgreSQL, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let email = EmailService::from_config(config).await;
        let state = Self::from_parts(pool, config, email);
        state.storage.ensure_root().await?;
        Ok(state)
    }

    /// Assemble state from an existing pool (tests, CLI)
    pub fn from_parts(pool: PgPool, config: &Config, email: EmailService) -> Self {
        Self {
            pool,
            jwt_secret: Arc::from(config.jwt_secret.as_str()),
            media: MediaContext::new(config.media_base_url(), config.venue_timezone),
            storage: LocalStorage::new(&config.media_dir, config.media_base_url()),
            email,
            rate_limiter: RateLimiter::new(),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.media.tz
    }
}
