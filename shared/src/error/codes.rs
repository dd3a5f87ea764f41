//! Unified error codes for the listings platform
//!
//! This module defines all error codes shared by the server, the admin CLI
//! and the frontend. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Venue errors
//! - 4xxx: Booking errors
//! - 5xxx: Daily menu errors
//! - 65xx: File upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Too many requests from the same client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Password too short
    PasswordTooShort = 1005,

    // ==================== 3xxx: Venue ====================
    /// Venue not found (any kind)
    VenueNotFound = 3001,
    /// Opening hours JSON could not be parsed
    OpeningHoursInvalid = 3003,
    /// Award not found
    AwardNotFound = 3101,
    /// Beach image not found
    BeachImageNotFound = 3201,
    /// Event has already ended
    EventEnded = 3302,

    // ==================== 4xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 4001,
    /// Venue does not accept bookings
    BookingNotAccepted = 4002,
    /// Booking date is in the past
    BookingDateInPast = 4003,
    /// Party size out of range
    BookingPartySizeInvalid = 4004,
    /// Status transition not allowed
    BookingInvalidTransition = 4005,

    // ==================== 5xxx: Daily menu ====================
    /// No menu password configured for the eatery
    MenuPasswordNotSet = 5001,
    /// Menu password does not match
    MenuPasswordInvalid = 5002,
    /// Menu token missing, expired or for another eatery
    MenuTokenInvalid = 5003,
    /// Daily menu not found
    MenuNotFound = 5004,
    /// Menu date lies before today
    MenuDateInPast = 5005,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Invalid file extension
    InvalidFileExtension = 6507,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::PasswordTooShort => "Password is too short",

            // Venue
            ErrorCode::VenueNotFound => "Venue not found",
            ErrorCode::OpeningHoursInvalid => "Opening hours are invalid",
            ErrorCode::AwardNotFound => "Award not found",
            ErrorCode::BeachImageNotFound => "Beach image not found",
            ErrorCode::EventEnded => "Event has already ended",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::BookingNotAccepted => "Venue does not accept bookings",
            ErrorCode::BookingDateInPast => "Booking date is in the past",
            ErrorCode::BookingPartySizeInvalid => "Party size is out of range",
            ErrorCode::BookingInvalidTransition => "Booking status change is not allowed",

            // Daily menu
            ErrorCode::MenuPasswordNotSet => "Menu uploads are not enabled for this eatery",
            ErrorCode::MenuPasswordInvalid => "Menu password is incorrect",
            ErrorCode::MenuTokenInvalid => "Menu access token is invalid or expired",
            ErrorCode::MenuNotFound => "Daily menu not found",
            ErrorCode::MenuDateInPast => "Menu date is in the past",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::PasswordTooShort),

            // Venue
            3001 => Ok(ErrorCode::VenueNotFound),
            3003 => Ok(ErrorCode::OpeningHoursInvalid),
            3101 => Ok(ErrorCode::AwardNotFound),
            3201 => Ok(ErrorCode::BeachImageNotFound),
            3302 => Ok(ErrorCode::EventEnded),

            // Booking
            4001 => Ok(ErrorCode::BookingNotFound),
            4002 => Ok(ErrorCode::BookingNotAccepted),
            4003 => Ok(ErrorCode::BookingDateInPast),
            4004 => Ok(ErrorCode::BookingPartySizeInvalid),
            4005 => Ok(ErrorCode::BookingInvalidTransition),

            // Daily menu
            5001 => Ok(ErrorCode::MenuPasswordNotSet),
            5002 => Ok(ErrorCode::MenuPasswordInvalid),
            5003 => Ok(ErrorCode::MenuTokenInvalid),
            5004 => Ok(ErrorCode::MenuNotFound),
            5005 => Ok(ErrorCode::MenuDateInPast),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6507 => Ok(ErrorCode::InvalidFileExtension),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::TooManyRequests.code(), 9);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::VenueNotFound.code(), 3001);
        assert_eq!(ErrorCode::BookingNotFound.code(), 4001);
        assert_eq!(ErrorCode::MenuPasswordNotSet.code(), 5001);
        assert_eq!(ErrorCode::FileTooLarge.code(), 6501);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(3302), Ok(ErrorCode::EventEnded));
        assert_eq!(
            ErrorCode::try_from(4005),
            Ok(ErrorCode::BookingInvalidTransition)
        );
        assert_eq!(ErrorCode::try_from(5003), Ok(ErrorCode::MenuTokenInvalid));
        assert_eq!(ErrorCode::try_from(5005), Ok(ErrorCode::MenuDateInPast));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
        // retired ranges stay unassigned
        assert_eq!(ErrorCode::try_from(2001), Err(InvalidErrorCode(2001)));
        assert_eq!(ErrorCode::try_from(9101), Err(InvalidErrorCode(9101)));
    }

    #[test]
    fn test_every_code_roundtrips_through_u16() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::TooManyRequests,
            ErrorCode::PasswordTooShort,
            ErrorCode::OpeningHoursInvalid,
            ErrorCode::AwardNotFound,
            ErrorCode::BeachImageNotFound,
            ErrorCode::BookingDateInPast,
            ErrorCode::MenuNotFound,
            ErrorCode::FileStorageFailed,
            ErrorCode::MenuDateInPast,
            ErrorCode::InternalError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::BookingNotFound).unwrap();
        assert_eq!(json, "4001");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("5002").unwrap();
        assert_eq!(code, ErrorCode::MenuPasswordInvalid);

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::VenueNotFound), "3001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::MenuPasswordInvalid.message(), "Menu password is incorrect");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
        assert_eq!(ErrorCode::PasswordTooShort.message(), "Password is too short");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
