//! Event Model
//!
//! Dated happenings (concerts, markets, festivals). Unlike venues they have
//! no weekly schedule; `starts_at`/`ends_at` are Unix millis.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    validate_coordinates, validate_optional_text, validate_price, validate_required_text,
};

/// Event entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub venue_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
    pub cover_image: Option<String>,
    pub gallery: Vec<String>,
    pub ticket_url: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Event {
    /// An event without an end time is over once it has started
    pub fn has_ended(&self, now_millis: i64) -> bool {
        self.ends_at.unwrap_or(self.starts_at) < now_millis
    }
}

/// Create event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventCreate {
    pub name: String,
    pub description: Option<String>,
    pub venue_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
    pub cover_image: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub ticket_url: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Update event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub venue_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub cover_image: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub ticket_url: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl EventCreate {
    pub fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_DESCRIPTION_LEN)?;
        validate_optional_text(&self.venue_name, "venue_name", MAX_NAME_LEN)?;
        validate_optional_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.city, "city", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.cover_image, "cover_image", MAX_URL_LEN)?;
        validate_optional_text(&self.ticket_url, "ticket_url", MAX_URL_LEN)?;
        validate_coordinates(self.latitude, self.longitude)?;
        validate_price(self.price, "price")?;
        validate_event_range(Some(self.starts_at), self.ends_at)
    }
}

impl EventUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&self.description, "description", MAX_DESCRIPTION_LEN)?;
        validate_optional_text(&self.venue_name, "venue_name", MAX_NAME_LEN)?;
        validate_optional_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.city, "city", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.cover_image, "cover_image", MAX_URL_LEN)?;
        validate_optional_text(&self.ticket_url, "ticket_url", MAX_URL_LEN)?;
        validate_price(self.price, "price")?;
        validate_event_range(self.starts_at, self.ends_at)
    }
}

/// `ends_at` must not precede `starts_at` when both are known
pub fn validate_event_range(starts_at: Option<i64>, ends_at: Option<i64>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (starts_at, ends_at)
        && end < start
    {
        return Err(AppError::validation("ends_at must not be before starts_at")
            .with_detail("field", "ends_at"));
    }
    Ok(())
}
