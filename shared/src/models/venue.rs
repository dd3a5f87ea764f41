//! Fields common to every venue kind

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::hours::{OpenStatus, WeeklySchedule};
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    validate_coordinates, validate_email, validate_optional_text, validate_required_text,
};

/// Every listing type the platform manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueKind {
    Restaurant,
    Eatery,
    Beach,
    Gym,
    Spa,
    SwimmingPool,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown venue kind '{0}'")]
pub struct UnknownVenueKind(pub String);

impl VenueKind {
    pub const ALL: [VenueKind; 7] = [
        VenueKind::Restaurant,
        VenueKind::Eatery,
        VenueKind::Beach,
        VenueKind::Gym,
        VenueKind::Spa,
        VenueKind::SwimmingPool,
        VenueKind::Event,
    ];

    /// Value stored in `bookings.venue_kind` and audit entries
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueKind::Restaurant => "restaurant",
            VenueKind::Eatery => "eatery",
            VenueKind::Beach => "beach",
            VenueKind::Gym => "gym",
            VenueKind::Spa => "spa",
            VenueKind::SwimmingPool => "swimming_pool",
            VenueKind::Event => "event",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Table holding this kind
    pub fn table(&self) -> &'static str {
        match self {
            VenueKind::Restaurant => "restaurants",
            VenueKind::Eatery => "eateries",
            VenueKind::Beach => "beaches",
            VenueKind::Gym => "gyms",
            VenueKind::Spa => "spas",
            VenueKind::SwimmingPool => "swimming_pools",
            VenueKind::Event => "events",
        }
    }

    /// URL segment (`/api/{segment}`)
    pub fn path_segment(&self) -> &'static str {
        match self {
            VenueKind::SwimmingPool => "swimming-pools",
            other => other.table(),
        }
    }

    pub fn from_path_segment(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.path_segment() == s)
    }

    /// Events are dated, everything else follows a weekly schedule
    pub fn has_opening_hours(&self) -> bool {
        !matches!(self, VenueKind::Event)
    }

    /// Human label used in notification emails
    pub fn label(&self) -> &'static str {
        match self {
            VenueKind::Restaurant => "Restaurant",
            VenueKind::Eatery => "Eatery",
            VenueKind::Beach => "Beach",
            VenueKind::Gym => "Gym",
            VenueKind::Spa => "Spa",
            VenueKind::SwimmingPool => "Swimming pool",
            VenueKind::Event => "Event",
        }
    }
}

impl std::fmt::Display for VenueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for VenueKind {
    type Error = UnknownVenueKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_db(&value).ok_or(UnknownVenueKind(value))
    }
}

/// Public view of the common venue columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueDetails {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Public URL
    pub cover_image: Option<String>,
    /// Public URLs
    pub gallery: Vec<String>,
    pub opening_hours: Option<WeeklySchedule>,
    /// Computed at read time in the venue timezone
    pub status: Option<OpenStatus>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Writable common fields on create
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueFieldsCreate {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Storage key or absolute URL
    pub cover_image: Option<String>,
    pub gallery: Option<Vec<String>>,
    /// Any accepted opening-hours shape
    pub opening_hours: Option<Value>,
    pub is_active: Option<bool>,
}

/// Writable common fields on update (`None` leaves the column unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueFieldsUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub cover_image: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub opening_hours: Option<Value>,
    pub is_active: Option<bool>,
}

impl VenueFieldsCreate {
    pub fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_common(
            &self.description,
            &self.address,
            &self.city,
            &self.phone,
            &self.email,
            &self.website,
            &self.cover_image,
        )?;
        validate_coordinates(self.latitude, self.longitude)?;
        Ok(())
    }

    /// Parsed schedule in canonical form (`None` when absent)
    pub fn schedule(&self) -> AppResult<Option<WeeklySchedule>> {
        parse_schedule(self.opening_hours.as_ref())
    }
}

impl VenueFieldsUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_common(
            &self.description,
            &self.address,
            &self.city,
            &self.phone,
            &self.email,
            &self.website,
            &self.cover_image,
        )?;
        // Partial coordinate updates are allowed; range-check what is given
        validate_coordinates(
            Some(self.latitude.unwrap_or_default()),
            Some(self.longitude.unwrap_or_default()),
        )?;
        Ok(())
    }

    pub fn schedule(&self) -> AppResult<Option<WeeklySchedule>> {
        parse_schedule(self.opening_hours.as_ref())
    }
}

fn validate_common(
    description: &Option<String>,
    address: &Option<String>,
    city: &Option<String>,
    phone: &Option<String>,
    email: &Option<String>,
    website: &Option<String>,
    cover_image: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(website, "website", MAX_URL_LEN)?;
    validate_optional_text(cover_image, "cover_image", MAX_URL_LEN)?;
    if let Some(email) = email
        && !email.trim().is_empty()
    {
        validate_email(email, "email")?;
    }
    Ok(())
}

fn parse_schedule(value: Option<&Value>) -> AppResult<Option<WeeklySchedule>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => WeeklySchedule::from_value(v).map(Some).map_err(|e| {
            AppError::with_message(ErrorCode::OpeningHoursInvalid, e.to_string())
                .with_detail("field", "opening_hours")
        }),
    }
}

/// Query parameters accepted by every venue list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueListQuery {
    pub city: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl VenueListQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_venue_kind_mappings() {
        for kind in VenueKind::ALL {
            assert_eq!(VenueKind::from_db(kind.as_str()), Some(kind));
            assert_eq!(VenueKind::from_path_segment(kind.path_segment()), Some(kind));
        }
        assert_eq!(VenueKind::SwimmingPool.path_segment(), "swimming-pools");
        assert_eq!(VenueKind::SwimmingPool.table(), "swimming_pools");
        assert_eq!(VenueKind::from_path_segment("swimming_pools"), None);
        assert!(!VenueKind::Event.has_opening_hours());
        assert!(VenueKind::try_from("castle".to_string()).is_err());
    }

    #[test]
    fn test_venue_kind_serde() {
        assert_eq!(
            serde_json::to_value(VenueKind::SwimmingPool).unwrap(),
            json!("swimming_pool")
        );
    }

    #[test]
    fn test_create_validation() {
        let mut fields = VenueFieldsCreate {
            name: "Chiringuito Pepe".into(),
            email: Some("pepe@example.com".into()),
            latitude: Some(36.5),
            longitude: Some(-4.9),
            ..Default::default()
        };
        assert!(fields.validate().is_ok());

        fields.name = " ".into();
        assert!(fields.validate().is_err());

        fields.name = "Pepe".into();
        fields.email = Some("not-an-email".into());
        assert!(fields.validate().is_err());

        fields.email = Some(String::new());
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn test_update_validation_allows_single_coordinate() {
        let update = VenueFieldsUpdate {
            latitude: Some(40.0),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = VenueFieldsUpdate {
            longitude: Some(200.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_schedule_parsing_errors_map_to_opening_hours_code() {
        let fields = VenueFieldsCreate {
            name: "X".into(),
            opening_hours: Some(json!({"someday": "10:00-12:00"})),
            ..Default::default()
        };
        let err = fields.schedule().unwrap_err();
        assert_eq!(err.code, ErrorCode::OpeningHoursInvalid);

        let fields = VenueFieldsCreate {
            name: "X".into(),
            opening_hours: Some(json!({"mon": "10:00-12:00"})),
            ..Default::default()
        };
        assert!(fields.schedule().unwrap().is_some());
    }

    #[test]
    fn test_list_query_limits() {
        let q = VenueListQuery::default();
        assert_eq!(q.limit(), 50);
        assert_eq!(q.offset(), 0);
        let q = VenueListQuery {
            limit: Some(10_000),
            offset: Some(-5),
            ..Default::default()
        };
        assert_eq!(q.limit(), 200);
        assert_eq!(q.offset(), 0);
    }
}
