//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 3xxx: Venue errors
/// - 4xxx: Booking errors
/// - 5xxx: Daily menu errors
/// - 6xxx: Upload errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx; 2xxx is unassigned)
    Auth,
    /// Venue errors (3xxx)
    Venue,
    /// Booking errors (4xxx)
    Booking,
    /// Daily menu errors (5xxx)
    Menu,
    /// Upload errors (6xxx)
    Upload,
    /// System errors (7xxx and above)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..3000 => Self::Auth,
            3000..4000 => Self::Venue,
            4000..5000 => Self::Booking,
            5000..6000 => Self::Menu,
            6000..7000 => Self::Upload,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Venue => "venue",
            Self::Booking => "booking",
            Self::Menu => "menu",
            Self::Upload => "upload",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
