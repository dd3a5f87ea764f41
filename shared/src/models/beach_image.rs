//! Beach Image Model (ordered gallery of a beach)

use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::validation::{MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text};

/// Beach image entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeachImage {
    pub id: i64,
    pub beach_id: i64,
    /// Public URL
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
}

/// Add beach image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeachImageCreate {
    /// Storage key (from `POST /api/admin/media`) or absolute URL
    pub image: String,
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
}

/// Update beach image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeachImageUpdate {
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
}

impl BeachImageCreate {
    pub fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.image, "image", MAX_URL_LEN)?;
        validate_optional_text(&self.caption, "caption", MAX_NOTE_LEN)
    }
}

impl BeachImageUpdate {
    pub fn validate(&self) -> AppResult<()> {
        validate_optional_text(&self.caption, "caption", MAX_NOTE_LEN)
    }
}
