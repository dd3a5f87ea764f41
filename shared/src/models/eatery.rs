//! Eatery Model
//!
//! Casual places publishing a daily menu. Staff upload the menu after
//! unlocking it with the eatery's menu password; the password hash itself
//! never leaves the database.

use serde::{Deserialize, Serialize};

use super::venue::{VenueDetails, VenueFieldsCreate, VenueFieldsUpdate};
use crate::error::AppResult;
use crate::validation::{MAX_SHORT_TEXT_LEN, validate_optional_text};

/// Eatery entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Eatery {
    #[serde(flatten)]
    pub venue: VenueDetails,
    pub cuisine: Option<String>,
    pub accepts_bookings: bool,
    pub has_menu_password: bool,
}

/// Create eatery payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EateryCreate {
    #[serde(flatten)]
    pub venue: VenueFieldsCreate,
    pub cuisine: Option<String>,
    #[serde(default)]
    pub accepts_bookings: bool,
}

/// Update eatery payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EateryUpdate {
    #[serde(flatten)]
    pub venue: VenueFieldsUpdate,
    pub cuisine: Option<String>,
    pub accepts_bookings: Option<bool>,
}

impl EateryCreate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        validate_optional_text(&self.cuisine, "cuisine", MAX_SHORT_TEXT_LEN)
    }
}

impl EateryUpdate {
    pub fn validate(&self) -> AppResult<()> {
        self.venue.validate()?;
        validate_optional_text(&self.cuisine, "cuisine", MAX_SHORT_TEXT_LEN)
    }
}

/// Menu password payload (admin set, public unlock)
#[derive(Debug, Clone, Deserialize)]
pub struct MenuPasswordRequest {
    pub password: String,
}

/// Issued by a successful unlock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuUnlockResponse {
    pub token: String,
    /// Seconds
    pub expires_in: i64,
}
