//! Spa Model

use serde::{Deserialize, Serialize};

use super::beach::validate_tags;
use super::venue::{VenueDetails, VenueFieldsCreate, VenueFieldsUpdate};
use crate::error::AppResult;

/// Spa entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spa {
    #[serde(flatten)]
    pub venue: VenueDetails,
    pub treatments: Vec<String>,
    pub accepts_bookings: bool,
}

/// Create spa payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaCreate {
    #[serde(flatten)]
    pub venue: VenueFieldsCreate,
    #[serde(default)]
    pub treatments: Vec<String>,
    #[serde(default)]
    pub accepts_bookings: bool,
}

/// Update spa payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaUpdate {
    #[serde(flatten)]
    pub venue: VenueFieldsUpdate,
    pub treatments: Option<Vec<String>>,
    pub accepts_bookings: Option<bool>,
}

impl SpaCreate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        validate_tags(&self.treatments, "treatments")
    }
}

impl SpaUpdate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        match &self.treatments {
            Some(t) => validate_tags(t, "treatments"),
            None => Ok(()),
        }
    }
}
