//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::award::Award;
use super::venue::{VenueDetails, VenueFieldsCreate, VenueFieldsUpdate};
use crate::error::AppResult;
use crate::validation::{MAX_SHORT_TEXT_LEN, validate_optional_text, validate_price_range};

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(flatten)]
    pub venue: VenueDetails,
    pub cuisine: Option<String>,
    /// 1 (€) to 4 (€€€€)
    pub price_range: Option<i16>,
    pub accepts_bookings: bool,
    /// Filled on detail reads
    #[serde(default)]
    pub awards: Vec<Award>,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    #[serde(flatten)]
    pub venue: VenueFieldsCreate,
    pub cuisine: Option<String>,
    pub price_range: Option<i16>,
    #[serde(default)]
    pub accepts_bookings: bool,
}

/// Update restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    #[serde(flatten)]
    pub venue: VenueFieldsUpdate,
    pub cuisine: Option<String>,
    pub price_range: Option<i16>,
    pub accepts_bookings: Option<bool>,
}

impl RestaurantCreate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        validate_optional_text(&self.cuisine, "cuisine", MAX_SHORT_TEXT_LEN)?;
        validate_price_range(self.price_range)
    }
}

impl RestaurantUpdate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        validate_optional_text(&self.cuisine, "cuisine", MAX_SHORT_TEXT_LEN)?;
        validate_price_range(self.price_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_payload_flattens_common_fields() {
        let payload: RestaurantCreate = serde_json::from_value(json!({
            "name": "El Faro",
            "city": "Málaga",
            "cuisine": "Seafood",
            "price_range": 3,
            "opening_hours": {"mon": "13:00-16:00"}
        }))
        .unwrap();
        assert_eq!(payload.venue.name, "El Faro");
        assert_eq!(payload.venue.city.as_deref(), Some("Málaga"));
        assert!(!payload.accepts_bookings);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_price_range_is_checked() {
        let payload: RestaurantUpdate =
            serde_json::from_value(json!({"price_range": 5})).unwrap();
        assert!(payload.validate().is_err());
    }
}
