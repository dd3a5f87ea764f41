//! Database access layer
//!
//! Free async functions over `&PgPool`. Venue kinds additionally implement
//! [`VenueStore`] so the HTTP layer can serve all of them with one set of
//! generic handlers.

pub mod admins;
pub mod audit;
pub mod awards;
pub mod beach_images;
pub mod beaches;
pub mod bookings;
pub mod eateries;
pub mod eatery_menus;
pub mod events;
pub mod gyms;
pub mod restaurants;
pub mod spas;
pub mod swimming_pools;
pub mod venue;
pub mod venues;

use std::future::Future;

use chrono_tz::Tz;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::AppResult;
use shared::models::{VenueKind, VenueListQuery};
use sqlx::PgPool;

pub use crate::BoxError;

/// What row conversion needs besides the row itself
#[derive(Debug, Clone)]
pub struct MediaContext {
    /// `{PUBLIC_BASE_URL}/media`
    pub base_url: String,
    /// Venue timezone for opening status
    pub tz: Tz,
}

impl MediaContext {
    pub fn new(base_url: impl Into<String>, tz: Tz) -> Self {
        Self {
            base_url: base_url.into(),
            tz,
        }
    }

    /// Public URL for a stored path (key or absolute URL)
    pub fn url(&self, raw: &str) -> Option<String> {
        shared::media::normalize_image_path(raw, &self.base_url)
    }
}

/// Per-kind persistence used by the generic venue handlers
pub trait VenueStore: Send + Sync + 'static {
    const KIND: VenueKind;

    type Model: Serialize + Send + 'static;
    type Create: DeserializeOwned + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;

    fn list(
        pool: &PgPool,
        ctx: &MediaContext,
        query: &VenueListQuery,
    ) -> impl Future<Output = Result<Vec<Self::Model>, BoxError>> + Send;

    /// Detail read, including child collections
    fn get(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
    ) -> impl Future<Output = Result<Option<Self::Model>, BoxError>> + Send;

    fn create(
        pool: &PgPool,
        ctx: &MediaContext,
        data: &Self::Create,
    ) -> impl Future<Output = Result<Self::Model, BoxError>> + Send;

    fn update(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
        data: &Self::Update,
    ) -> impl Future<Output = Result<Option<Self::Model>, BoxError>> + Send;

    /// Delete the row and its children; returns the media keys they referenced
    fn delete(
        pool: &PgPool,
        id: i64,
    ) -> impl Future<Output = Result<Option<Vec<String>>, BoxError>> + Send;

    fn validate_create(data: &Self::Create) -> AppResult<()>;

    fn validate_update(data: &Self::Update) -> AppResult<()>;

    fn id(model: &Self::Model) -> i64;

    fn is_active(model: &Self::Model) -> bool;
}

/// Stored form of an image reference: absolute URLs as given, anything else
/// reduced to its storage key. Empty input clears the reference.
pub fn clean_image(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }
    if let Some(rest) = trimmed.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    shared::media::storage_key(trimmed)
}

/// Stored form of a gallery list
pub fn clean_gallery(items: &[String]) -> serde_json::Value {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if let Some(key) = clean_image(item)
            && !out.contains(&key)
        {
            out.push(key);
        }
    }
    serde_json::Value::from(out)
}

/// Stored form of a facilities/treatments list
pub fn clean_tags(items: &[String]) -> serde_json::Value {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|s| s == item) {
            out.push(item.to_string());
        }
    }
    serde_json::Value::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_image() {
        assert_eq!(clean_image("https://x.org/a.jpg").as_deref(), Some("https://x.org/a.jpg"));
        assert_eq!(clean_image("//x.org/a.jpg").as_deref(), Some("https://x.org/a.jpg"));
        assert_eq!(
            clean_image("/storage/venues/a.jpg").as_deref(),
            Some("venues/a.jpg")
        );
        assert_eq!(clean_image("  "), None);
        assert_eq!(clean_image("../x.jpg"), None);
    }

    #[test]
    fn test_clean_gallery_dedupes_keys() {
        let gallery = clean_gallery(&[
            "gallery/a.jpg".into(),
            "/storage/gallery/a.jpg".into(),
            "".into(),
            "https://x.org/b.jpg".into(),
        ]);
        assert_eq!(gallery, json!(["gallery/a.jpg", "https://x.org/b.jpg"]));
    }

    #[test]
    fn test_clean_tags() {
        assert_eq!(
            clean_tags(&[" showers ".into(), "showers".into(), "".into(), "wifi".into()]),
            json!(["showers", "wifi"])
        );
    }

    #[test]
    fn test_media_context_url() {
        let ctx = MediaContext::new("http://localhost:8080/media", chrono_tz::Europe::Madrid);
        assert_eq!(
            ctx.url("menus/abc.pdf").as_deref(),
            Some("http://localhost:8080/media/menus/abc.pdf")
        );
    }
}
