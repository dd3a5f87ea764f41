//! Award Model (belongs to a restaurant)

use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};

/// Award entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Award {
    pub id: i64,
    pub restaurant_id: i64,
    pub title: String,
    pub issuer: Option<String>,
    pub year: Option<i32>,
    /// Public URL
    pub image: Option<String>,
}

/// Create award payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardCreate {
    pub title: String,
    pub issuer: Option<String>,
    pub year: Option<i32>,
    /// Storage key or absolute URL
    pub image: Option<String>,
}

/// Update award payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardUpdate {
    pub title: Option<String>,
    pub issuer: Option<String>,
    pub year: Option<i32>,
    pub image: Option<String>,
}

impl AwardCreate {
    pub fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.title, "title", MAX_NAME_LEN)?;
        validate_optional_text(&self.issuer, "issuer", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)
    }
}

impl AwardUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(title) = &self.title {
            validate_required_text(title, "title", MAX_NAME_LEN)?;
        }
        validate_optional_text(&self.issuer, "issuer", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)
    }
}
