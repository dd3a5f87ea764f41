//! Swimming Pool Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::beach::validate_tags;
use super::venue::{VenueDetails, VenueFieldsCreate, VenueFieldsUpdate};
use crate::error::AppResult;
use crate::validation::validate_price;

/// Swimming pool entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwimmingPool {
    #[serde(flatten)]
    pub venue: VenueDetails,
    pub facilities: Vec<String>,
    pub indoor: bool,
    pub heated: bool,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub entry_price: Option<Decimal>,
}

/// Create swimming pool payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwimmingPoolCreate {
    #[serde(flatten)]
    pub venue: VenueFieldsCreate,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub indoor: bool,
    #[serde(default)]
    pub heated: bool,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub entry_price: Option<Decimal>,
}

/// Update swimming pool payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwimmingPoolUpdate {
    #[serde(flatten)]
    pub venue: VenueFieldsUpdate,
    pub facilities: Option<Vec<String>>,
    pub indoor: Option<bool>,
    pub heated: Option<bool>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub entry_price: Option<Decimal>,
}

impl SwimmingPoolCreate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        validate_tags(&self.facilities, "facilities")?;
        validate_price(self.entry_price, "entry_price")
    }
}

impl SwimmingPoolUpdate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        if let Some(f) = &self.facilities {
            validate_tags(f, "facilities")?;
        }
        validate_price(self.entry_price, "entry_price")
    }
}
