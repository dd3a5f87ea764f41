//! Booking Model

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::venue::VenueKind;
use crate::error::AppResult;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_party_size, validate_required_text,
};

/// Booking lifecycle: `pending` → `confirmed` → `cancelled`, or straight to
/// `cancelled`. Cancelled is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown booking status '{0}'")]
pub struct UnknownBookingStatus(pub String);

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = UnknownBookingStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_db(&value).ok_or(UnknownBookingStatus(value))
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub venue_kind: VenueKind,
    pub venue_id: i64,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    /// YYYY-MM-DD
    pub booking_date: String,
    /// HH:MM
    pub booking_time: Option<String>,
    pub party_size: i32,
    pub notes: Option<String>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: BookingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub venue_kind: VenueKind,
    pub venue_id: i64,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub booking_date: String,
    pub booking_time: Option<String>,
    pub party_size: i32,
    pub notes: Option<String>,
}

impl BookingCreate {
    /// Field-level checks; date parsing and venue checks happen in the handler
    pub fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.guest_name, "guest_name", MAX_NAME_LEN)?;
        validate_email(&self.guest_email, "guest_email")?;
        validate_optional_text(&self.guest_phone, "guest_phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.notes, "notes", MAX_NOTE_LEN)?;
        validate_party_size(self.party_size)
    }
}

/// Admin status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

/// Admin booking list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub venue_kind: Option<VenueKind>,
    pub venue_id: Option<i64>,
    /// YYYY-MM-DD
    pub date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_db_strings() {
        for s in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::try_from(s.as_str().to_string()), Ok(s));
        }
        assert!(BookingStatus::try_from("done".to_string()).is_err());
    }

    #[test]
    fn test_booking_create_validation() {
        let mut req: BookingCreate = serde_json::from_value(json!({
            "venue_kind": "restaurant",
            "venue_id": 7,
            "guest_name": "Ana",
            "guest_email": "ana@example.com",
            "booking_date": "2030-01-01",
            "booking_time": "21:00",
            "party_size": 4
        }))
        .unwrap();
        assert_eq!(req.venue_kind, VenueKind::Restaurant);
        assert!(req.validate().is_ok());

        req.party_size = 0;
        assert!(req.validate().is_err());
    }
}
