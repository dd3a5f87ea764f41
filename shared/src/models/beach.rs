//! Beach Model

use serde::{Deserialize, Serialize};

use super::beach_image::BeachImage;
use super::venue::{VenueDetails, VenueFieldsCreate, VenueFieldsUpdate};
use crate::error::AppResult;
use crate::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};

/// Beach entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beach {
    #[serde(flatten)]
    pub venue: VenueDetails,
    pub facilities: Vec<String>,
    pub blue_flag: bool,
    pub lifeguard: bool,
    pub accessible: bool,
    /// Filled on detail reads
    #[serde(default)]
    pub images: Vec<BeachImage>,
}

/// Create beach payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeachCreate {
    #[serde(flatten)]
    pub venue: VenueFieldsCreate,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub blue_flag: bool,
    #[serde(default)]
    pub lifeguard: bool,
    #[serde(default)]
    pub accessible: bool,
}

/// Update beach payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeachUpdate {
    #[serde(flatten)]
    pub venue: VenueFieldsUpdate,
    pub facilities: Option<Vec<String>>,
    pub blue_flag: Option<bool>,
    pub lifeguard: Option<bool>,
    pub accessible: Option<bool>,
}

impl BeachCreate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        validate_tags(&self.facilities, "facilities")
    }
}

impl BeachUpdate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        match &self.facilities {
            Some(f) => validate_tags(f, "facilities"),
            None => Ok(()),
        }
    }
}

/// Each entry of a facilities/treatments list is a short non-empty label
pub fn validate_tags(items: &[String], field: &str) -> AppResult<()> {
    for item in items {
        validate_required_text(item, field, MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}
