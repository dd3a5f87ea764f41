//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! admin CRUD handlers and the public booking endpoint. PostgreSQL TEXT has no
//! length enforcement, so these limits are the only guard.

use rust_decimal::Decimal;

use crate::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Venue, event, award and guest names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and long-form copy
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Booking notes, menu notes, captions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, cuisine, issuer, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Menu passwords are shared with kitchen staff, so they may be short
pub const MIN_MENU_PASSWORD_LEN: usize = 4;

/// Admin passwords
pub const MIN_ADMIN_PASSWORD_LEN: usize = 8;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Largest party accepted by the public booking form
pub const MAX_PARTY_SIZE: i32 = 50;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Minimal structural email check: one `@`, non-empty local part, dotted domain
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("{field} is not a valid email address"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Latitude/longitude must be given together and within range
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), AppError> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    format!("latitude {lat} out of range"),
                ));
            }
            if !(-180.0..=180.0).contains(&lng) {
                return Err(AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    format!("longitude {lng} out of range"),
                ));
            }
            Ok(())
        }
        _ => Err(AppError::validation(
            "latitude and longitude must be provided together",
        )),
    }
}

/// Restaurant price range is 1 (€) to 4 (€€€€)
pub fn validate_price_range(value: Option<i16>) -> Result<(), AppError> {
    if let Some(v) = value
        && !(1..=4).contains(&v)
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("price_range must be between 1 and 4, got {v}"),
        )
        .with_detail("field", "price_range"));
    }
    Ok(())
}

pub fn validate_party_size(value: i32) -> Result<(), AppError> {
    if !(1..=MAX_PARTY_SIZE).contains(&value) {
        return Err(AppError::with_message(
            ErrorCode::BookingPartySizeInvalid,
            format!("party_size must be between 1 and {MAX_PARTY_SIZE}, got {value}"),
        ));
    }
    Ok(())
}

/// Prices are optional but never negative
pub fn validate_price(value: Option<Decimal>, field: &str) -> Result<(), AppError> {
    if let Some(v) = value
        && v.is_sign_negative()
        && !v.is_zero()
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must not be negative"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_password(value: &str, min_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min_len {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {min_len} characters"),
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("La Perla", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let err = validate_required_text("abcdef", "name", 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("name is too long"));
        // limits count characters, not bytes
        assert!(validate_required_text("ñññññ", "name", 5).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", 3).is_ok());
        assert!(validate_optional_text(&Some("abc".into()), "notes", 3).is_ok());
        assert!(validate_optional_text(&Some("abcd".into()), "notes", 3).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("guest@example.com", "guest_email").is_ok());
        for bad in ["guest", "guest@", "@example.com", "a@b", "a b@example.com", "a@b@c.com"] {
            let err = validate_email(bad, "guest_email").unwrap_err();
            assert_ne!(err.code, ErrorCode::Success, "accepted {bad}");
        }
    }

    #[test]
    fn test_coordinates() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(36.72), Some(-4.42)).is_ok());
        assert!(validate_coordinates(Some(91.0), Some(0.0)).is_err());
        assert!(validate_coordinates(Some(0.0), Some(181.0)).is_err());
        assert!(validate_coordinates(Some(36.72), None).is_err());
    }

    #[test]
    fn test_price_range_and_party_size() {
        assert!(validate_price_range(None).is_ok());
        assert!(validate_price_range(Some(4)).is_ok());
        assert!(validate_price_range(Some(0)).is_err());
        assert!(validate_party_size(2).is_ok());
        assert_eq!(
            validate_party_size(0).unwrap_err().code,
            ErrorCode::BookingPartySizeInvalid
        );
        assert!(validate_party_size(MAX_PARTY_SIZE + 1).is_err());
    }

    #[test]
    fn test_password() {
        assert!(validate_password("1234", MIN_MENU_PASSWORD_LEN).is_ok());
        assert_eq!(
            validate_password("123", MIN_MENU_PASSWORD_LEN).unwrap_err().code,
            ErrorCode::PasswordTooShort
        );
        assert!(validate_password("short", MIN_ADMIN_PASSWORD_LEN).is_err());
    }
}
