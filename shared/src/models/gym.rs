//! Gym Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::beach::validate_tags;
use super::venue::{VenueDetails, VenueFieldsCreate, VenueFieldsUpdate};
use crate::error::AppResult;
use crate::validation::validate_price;

/// Gym entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gym {
    #[serde(flatten)]
    pub venue: VenueDetails,
    pub facilities: Vec<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub day_pass_price: Option<Decimal>,
}

/// Create gym payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymCreate {
    #[serde(flatten)]
    pub venue: VenueFieldsCreate,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub day_pass_price: Option<Decimal>,
}

/// Update gym payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymUpdate {
    #[serde(flatten)]
    pub venue: VenueFieldsUpdate,
    pub facilities: Option<Vec<String>>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub day_pass_price: Option<Decimal>,
}

impl GymCreate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        validate_tags(&self.facilities, "facilities")?;
        validate_price(self.day_pass_price, "day_pass_price")
    }
}

impl GymUpdate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        if let Some(f) = &self.facilities {
            validate_tags(f, "facilities")?;
        }
        validate_price(self.day_pass_price, "day_pass_price")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_is_a_json_number() {
        let payload: GymCreate = serde_json::from_value(json!({
            "name": "Iron Temple",
            "facilities": ["weights", "sauna"],
            "day_pass_price": 12.5
        }))
        .unwrap();
        assert_eq!(payload.day_pass_price, Some(Decimal::new(125, 1)));
        assert!(payload.validate().is_ok());

        let negative: GymUpdate =
            serde_json::from_value(json!({"day_pass_price": -1})).unwrap();
        assert!(negative.validate().is_err());
    }
}
