//! Eatery Menu Model (one uploaded daily menu per eatery and date)

use serde::{Deserialize, Serialize};

/// Eatery menu entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EateryMenu {
    pub id: i64,
    pub eatery_id: i64,
    /// YYYY-MM-DD in the venue timezone
    pub menu_date: String,
    /// Public URL
    pub url: String,
    pub content_type: String,
    pub notes: Option<String>,
    pub uploaded_at: i64,
}
