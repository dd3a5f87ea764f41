//! Server configuration

use chrono_tz::Tz;

use crate::BoxError;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for admin and menu tokens
    pub jwt_secret: String,
    /// Root directory for uploaded media
    pub media_dir: String,
    /// Externally visible base URL (media URLs are `{base}/media/{key}`)
    pub public_base_url: String,
    /// Timezone every venue operates in
    pub venue_timezone: Tz,
    /// SES sender email address
    pub ses_from_email: String,
    /// Admin inbox for booking and menu notifications
    pub notify_email: Option<String>,
    /// Send through SES (otherwise emails are only logged)
    pub email_enabled: bool,
    /// Allowed CORS origins; empty means permissive in development
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_dev = environment == "development";

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            media_dir: std::env::var("MEDIA_DIR").unwrap_or_else(|_| "./media".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into())
                .trim_end_matches('/')
                .to_string(),
            venue_timezone: shared::time::parse_timezone(
                &std::env::var("VENUE_TIMEZONE").unwrap_or_else(|_| "Europe/Madrid".into()),
            ),
            ses_from_email: std::env::var("SES_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@localhost".into()),
            notify_email: std::env::var("NOTIFY_EMAIL").ok().filter(|s| !s.is_empty()),
            email_enabled: std::env::var("EMAIL_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(!is_dev),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Base URL media keys are appended to
    pub fn media_base_url(&self) -> String {
        format!("{}/media", self.public_base_url)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
