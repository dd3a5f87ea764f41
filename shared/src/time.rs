//! Time helpers in the venue timezone
//!
//! Every date-to-timestamp conversion happens at the API layer; repositories
//! only see `i64` Unix millis or validated `YYYY-MM-DD` strings.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use crate::error::{AppError, AppResult, ErrorCode};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Parse a wall-clock time string (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// Parse an IANA timezone name, falling back to Europe/Madrid
pub fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse timezone '{}': {}, falling back to Europe/Madrid",
            name,
            e
        );
        chrono_tz::Europe::Madrid
    })
}

/// Current local wall-clock time in the venue timezone
pub fn local_now(tz: Tz) -> NaiveDateTime {
    chrono::Utc::now().with_timezone(&tz).naive_local()
}

/// Today's date in the venue timezone
pub fn today(tz: Tz) -> NaiveDate {
    local_now(tz).date()
}

/// Reject dates before today (venue timezone), reporting `code`
pub fn validate_not_past(date: NaiveDate, tz: Tz, code: ErrorCode) -> AppResult<()> {
    let today = today(tz);
    if date < today {
        return Err(AppError::with_message(
            code,
            format!("Date {} is in the past (today is {})", date, today),
        ));
    }
    Ok(())
}

/// Local wall-clock time → Unix millis (venue timezone)
///
/// DST gap fallback: if the local time does not exist, interpret it as UTC.
pub fn local_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let d = parse_date("2026-07-14").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 7, 14).unwrap());
        assert!(parse_date("14/07/2026").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("21:30").unwrap(),
            NaiveTime::from_hms_opt(21, 30, 0).unwrap()
        );
        assert!(parse_time("9pm").is_err());
    }

    #[test]
    fn test_parse_timezone_fallback() {
        assert_eq!(parse_timezone("Atlantic/Canary"), chrono_tz::Atlantic::Canary);
        assert_eq!(parse_timezone("Mars/Olympus"), chrono_tz::Europe::Madrid);
    }

    #[test]
    fn test_validate_not_past() {
        let tz = chrono_tz::Europe::Madrid;
        assert!(validate_not_past(today(tz), tz, ErrorCode::BookingDateInPast).is_ok());
        let yesterday = today(tz) - chrono::Duration::days(2);
        let err = validate_not_past(yesterday, tz, ErrorCode::MenuDateInPast).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuDateInPast);
    }

    #[test]
    fn test_local_to_millis_in_summer_time() {
        let naive = NaiveDate::from_ymd_opt(2026, 7, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        // Madrid is UTC+2 in July
        let expected = naive.and_utc().timestamp_millis() - 2 * 3600 * 1000;
        assert_eq!(local_to_millis(naive, chrono_tz::Europe::Madrid), expected);
    }
}
