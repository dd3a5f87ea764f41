//! Weekly opening hours
//!
//! Venues store their schedule as JSON. Over the years the admin UI has written
//! several shapes into the same column (objects keyed by weekday, seven-entry
//! arrays, `"09:00-17:00"` strings, double-encoded JSON strings), so parsing is
//! deliberately tolerant while the serialized form is always canonical:
//!
//! ```json
//! { "monday": [{ "open": "09:00", "close": "17:00" }], "tuesday": [], ... }
//! ```
//!
//! All evaluation works on local wall-clock time (`NaiveDateTime`) in the venue
//! timezone; callers convert with [`local_now`](crate::time::local_now).

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Minutes in one day
pub const MINUTES_PER_DAY: u16 = 1440;

/// Default threshold for reporting a venue as "closing soon"
pub const CLOSING_SOON_MINUTES: i64 = 30;

const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoursError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("unknown day '{0}'")]
    UnknownDay(String),
    #[error("invalid entry for {day}: {reason}")]
    InvalidEntry { day: String, reason: String },
    #[error("opening hours must be an object keyed by weekday or an array of 7 days")]
    InvalidShape,
}

/// One opening window, in minutes since local midnight.
///
/// `close` is greater than `open` and may exceed [`MINUTES_PER_DAY`] when the
/// window runs past midnight into the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub open: u16,
    pub close: u16,
}

impl TimeWindow {
    /// Build a window from raw wall-clock minutes.
    ///
    /// `close == open` means 24 hours, `close < open` means the window ends on
    /// the next day.
    pub fn new(open: u16, close: u16) -> Result<Self, HoursError> {
        if open >= MINUTES_PER_DAY {
            return Err(HoursError::InvalidTime(format_minutes(open)));
        }
        if close > MINUTES_PER_DAY {
            return Err(HoursError::InvalidTime(format_minutes(close)));
        }
        let close = if close <= open {
            close + MINUTES_PER_DAY
        } else {
            close
        };
        Ok(Self { open, close })
    }

    /// Whether the window spills into the following day
    pub fn is_overnight(&self) -> bool {
        self.close > MINUTES_PER_DAY
    }

    fn contains(&self, minute: u32) -> bool {
        u32::from(self.open) <= minute && minute < u32::from(self.close)
    }
}

/// Current opening state of a venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OpenStatus {
    /// Open; `closes_at` is `None` when the venue never closes within a week
    Open { closes_at: Option<NaiveDateTime> },
    /// Open, but closing within the threshold
    ClosingSoon { closes_at: NaiveDateTime },
    /// Closed; `next_opening` is `None` when the schedule has no windows
    Closed { next_opening: Option<NaiveDateTime> },
}

impl OpenStatus {
    pub fn is_open(&self) -> bool {
        !matches!(self, OpenStatus::Closed { .. })
    }
}

/// Seven day slots, Monday first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<TimeWindow>; 7],
}

impl WeeklySchedule {
    /// Parse a schedule from any of the accepted JSON shapes
    pub fn from_value(value: &Value) -> Result<Self, HoursError> {
        Self::from_value_inner(value, true)
    }

    /// Parse a schedule from a JSON string
    pub fn from_json_str(raw: &str) -> Result<Self, HoursError> {
        Self::from_value(&Value::String(raw.to_string()))
    }

    fn from_value_inner(value: &Value, allow_nested: bool) -> Result<Self, HoursError> {
        let mut schedule = Self::default();
        match value {
            Value::Null => {}
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed == "null" {
                    return Ok(schedule);
                }
                if !allow_nested {
                    return Err(HoursError::InvalidShape);
                }
                // Column written with json_encode() on an already encoded string
                let decoded: Value =
                    serde_json::from_str(trimmed).map_err(|_| HoursError::InvalidShape)?;
                return Self::from_value_inner(&decoded, false);
            }
            Value::Object(map) => {
                for (key, day_value) in map {
                    let idx = day_index(key).ok_or_else(|| HoursError::UnknownDay(key.clone()))?;
                    let windows = parse_day(DAY_NAMES[idx], day_value)?;
                    schedule.days[idx].extend(windows);
                }
            }
            Value::Array(entries) => {
                if entries.len() != 7 {
                    return Err(HoursError::InvalidShape);
                }
                for (idx, day_value) in entries.iter().enumerate() {
                    schedule.days[idx] = parse_day(DAY_NAMES[idx], day_value)?;
                }
            }
            _ => return Err(HoursError::InvalidShape),
        }

        for day in schedule.days.iter_mut() {
            day.sort_by_key(|w| w.open);
        }
        Ok(schedule)
    }

    /// Build a schedule directly from windows (Monday first)
    pub fn from_days(days: [Vec<TimeWindow>; 7]) -> Self {
        let mut schedule = Self { days };
        for day in schedule.days.iter_mut() {
            day.sort_by_key(|w| w.open);
        }
        schedule
    }

    /// Windows for a weekday
    pub fn windows_for(&self, weekday: chrono::Weekday) -> &[TimeWindow] {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// True when no day has any window
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.is_empty())
    }

    /// Whether the venue is open at the given local time
    pub fn is_open(&self, at: NaiveDateTime) -> bool {
        self.latest_end_covering(at).is_some()
    }

    /// End of the opening period containing `at`.
    ///
    /// Overlapping and back-to-back windows (one starting exactly when the
    /// previous ends) are followed, so a venue open around the clock reports
    /// the end of the run. Returns `None` when closed, and also when open
    /// without a break for a whole week; use [`is_open`](Self::is_open) to
    /// tell the two apart.
    pub fn closes_at(&self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        let end = self.latest_end_covering(at)?;
        self.follow_chain(end)
    }

    /// Earliest window start strictly after `at`, looking one week ahead
    pub fn next_opening(&self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        for offset in 0..=7 {
            let date = at.date() + Duration::days(offset);
            let midnight = date.and_hms_opt(0, 0, 0)?;
            for window in &self.days[weekday_index(date)] {
                let start = midnight + Duration::minutes(i64::from(window.open));
                if start > at {
                    return Some(start);
                }
            }
        }
        None
    }

    /// Opening state at the given local time
    pub fn status_at(&self, at: NaiveDateTime, closing_soon: Duration) -> OpenStatus {
        if !self.is_open(at) {
            return OpenStatus::Closed {
                next_opening: self.next_opening(at),
            };
        }
        match self.closes_at(at) {
            Some(closes_at) if closes_at - at <= closing_soon => {
                OpenStatus::ClosingSoon { closes_at }
            }
            closes_at => OpenStatus::Open { closes_at },
        }
    }

    /// Opening state right now in the venue timezone
    pub fn status_now(&self, tz: Tz) -> OpenStatus {
        self.status_at(
            crate::time::local_now(tz),
            Duration::minutes(CLOSING_SOON_MINUTES),
        )
    }

    /// Latest end among every window that contains `at`, including overnight
    /// windows started the previous day
    fn latest_end_covering(&self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        let minute = at.hour() * 60 + at.minute();
        let today = at.date();
        let yesterday = today.pred_opt()?;

        let today_ends = self.days[weekday_index(today)]
            .iter()
            .filter(|w| w.contains(minute))
            .map(|w| (today, w.close));
        let spill_ends = self.days[weekday_index(yesterday)]
            .iter()
            .filter(|w| w.is_overnight() && w.contains(minute + u32::from(MINUTES_PER_DAY)))
            .map(|w| (yesterday, w.close));

        today_ends
            .chain(spill_ends)
            .filter_map(|(base, close)| {
                base.and_hms_opt(0, 0, 0)
                    .map(|m| m + Duration::minutes(i64::from(close)))
            })
            .max()
    }

    fn follow_chain(&self, mut end: NaiveDateTime) -> Option<NaiveDateTime> {
        let limit = end + Duration::days(7);
        loop {
            match self.latest_end_covering(end) {
                Some(next_end) if next_end > end => {
                    end = next_end;
                    if end >= limit {
                        return None;
                    }
                }
                _ => return Some(end),
            }
        }
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        #[derive(Serialize)]
        struct WindowOut {
            open: String,
            close: String,
        }

        let mut map = serializer.serialize_map(Some(7))?;
        for (idx, windows) in self.days.iter().enumerate() {
            let out: Vec<WindowOut> = windows
                .iter()
                .map(|w| WindowOut {
                    open: format_minutes(w.open),
                    close: if w.close == MINUTES_PER_DAY {
                        "24:00".to_string()
                    } else {
                        format_minutes(w.close % MINUTES_PER_DAY)
                    },
                })
                .collect();
            map.serialize_entry(DAY_NAMES[idx], &out)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        WeeklySchedule::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

fn day_index(key: &str) -> Option<usize> {
    let key = key.trim().to_lowercase();
    DAY_NAMES
        .iter()
        .position(|name| *name == key || (key.len() == 3 && name.starts_with(&key)))
}

fn parse_day(day: &str, value: &Value) -> Result<Vec<TimeWindow>, HoursError> {
    let invalid = |reason: &str| HoursError::InvalidEntry {
        day: day.to_string(),
        reason: reason.to_string(),
    };

    match value {
        Value::Null | Value::Bool(false) => Ok(Vec::new()),
        Value::String(s) => parse_day_string(day, s),
        Value::Object(map) => {
            if map.get("closed").and_then(Value::as_bool) == Some(true) {
                return Ok(Vec::new());
            }
            let open = map
                .get("open")
                .or_else(|| map.get("from"))
                .and_then(Value::as_str);
            let close = map
                .get("close")
                .or_else(|| map.get("to"))
                .and_then(Value::as_str);
            match (open, close) {
                (Some(open), Some(close)) => {
                    Ok(vec![TimeWindow::new(parse_hhmm(open)?, parse_hhmm(close)?)?])
                }
                (None, None) if map.get("closed").is_some() => Ok(Vec::new()),
                _ => Err(invalid("expected both 'open' and 'close'")),
            }
        }
        Value::Array(items) => {
            let mut windows = Vec::new();
            for item in items {
                if item.is_array() {
                    return Err(invalid("nested arrays are not allowed"));
                }
                windows.extend(parse_day(day, item)?);
            }
            Ok(windows)
        }
        _ => Err(invalid("expected an object, array or string")),
    }
}

fn parse_day_string(day: &str, raw: &str) -> Result<Vec<TimeWindow>, HoursError> {
    let lowered = raw.trim().to_lowercase();
    match lowered.as_str() {
        "" | "closed" | "cerrado" | "-" => return Ok(Vec::new()),
        "24h" | "24 h" | "24 hours" | "open 24 hours" => {
            return Ok(vec![TimeWindow::new(0, MINUTES_PER_DAY)?]);
        }
        _ => {}
    }

    let mut windows = Vec::new();
    for part in lowered.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (open, close) = part
            .split_once('-')
            .or_else(|| part.split_once('–'))
            .ok_or_else(|| HoursError::InvalidEntry {
                day: day.to_string(),
                reason: format!("'{part}' is not a HH:MM-HH:MM range"),
            })?;
        windows.push(TimeWindow::new(parse_hhmm(open)?, parse_hhmm(close)?)?);
    }
    Ok(windows)
}

/// Parse `H:MM`, `HH:MM` or `HH:MM:SS` into minutes since midnight (`24:00` allowed)
pub fn parse_hhmm(raw: &str) -> Result<u16, HoursError> {
    let err = || HoursError::InvalidTime(raw.trim().to_string());
    let mut parts = raw.trim().split(':');
    let hours: u16 = parts
        .next()
        .filter(|h| !h.is_empty() && h.len() <= 2)
        .and_then(|h| h.parse().ok())
        .ok_or_else(err)?;
    let minutes: u16 = parts
        .next()
        .filter(|m| m.len() == 2)
        .and_then(|m| m.parse().ok())
        .ok_or_else(err)?;
    if let Some(seconds) = parts.next()
        && seconds.parse::<u16>().map(|s| s >= 60).unwrap_or(true)
    {
        return Err(err());
    }
    if parts.next().is_some() || minutes >= 60 || hours > 24 || (hours == 24 && minutes != 0) {
        return Err(err());
    }
    Ok(hours * 60 + minutes)
}

fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use serde_json::json;

    /// 2026-10-19 is a Monday
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn office_hours() -> WeeklySchedule {
        WeeklySchedule::from_value(&json!({
            "monday": {"open": "09:00", "close": "17:00"},
            "tuesday": {"open": "09:00", "close": "17:00"},
            "wednesday": {"closed": true},
            "thursday": "09:00-13:00, 16:00-20:00",
            "friday": [{"open": "12:00", "close": "16:00"}, {"open": "20:00", "close": "02:00"}],
            "saturday": "closed"
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:00"), Ok(540));
        assert_eq!(parse_hhmm("9:30"), Ok(570));
        assert_eq!(parse_hhmm("23:59:00"), Ok(1439));
        assert_eq!(parse_hhmm("24:00"), Ok(1440));
        assert!(parse_hhmm("24:30").is_err());
        assert!(parse_hhmm("12:60").is_err());
        assert!(parse_hhmm("noon").is_err());
        assert!(parse_hhmm("12").is_err());
    }

    #[test]
    fn test_time_window_normalizes_overnight_and_24h() {
        let w = TimeWindow::new(1200, 120).unwrap();
        assert_eq!(w.close, 1560);
        assert!(w.is_overnight());

        let full = TimeWindow::new(600, 600).unwrap();
        assert_eq!(full.close, 2040);

        assert!(TimeWindow::new(1440, 100).is_err());
    }

    #[test]
    fn test_is_open_simple_day() {
        let s = office_hours();
        assert!(!s.is_open(at(19, 8, 59)));
        assert!(s.is_open(at(19, 9, 0)));
        assert!(s.is_open(at(19, 16, 59)));
        assert!(!s.is_open(at(19, 17, 0)));
    }

    #[test]
    fn test_closed_day_and_missing_day() {
        let s = office_hours();
        assert!(!s.is_open(at(21, 12, 0))); // wednesday closed
        assert!(!s.is_open(at(24, 12, 0))); // saturday closed
        assert!(!s.is_open(at(25, 12, 0))); // sunday missing
    }

    #[test]
    fn test_split_shift_string() {
        let s = office_hours();
        assert!(s.is_open(at(22, 10, 0)));
        assert!(!s.is_open(at(22, 14, 0)));
        assert!(s.is_open(at(22, 19, 59)));
        assert_eq!(s.windows_for(Weekday::Thu).len(), 2);
    }

    #[test]
    fn test_overnight_window_spills_into_next_day() {
        let s = office_hours();
        // friday 20:00 - saturday 02:00
        assert!(s.is_open(at(23, 23, 30)));
        assert!(s.is_open(at(24, 1, 30)));
        assert!(!s.is_open(at(24, 2, 0)));
        assert_eq!(s.closes_at(at(24, 1, 30)), Some(at(24, 2, 0)));
    }

    #[test]
    fn test_next_opening() {
        let s = office_hours();
        // monday evening -> tuesday morning
        assert_eq!(s.next_opening(at(19, 18, 0)), Some(at(20, 9, 0)));
        // tuesday evening -> wednesday closed -> thursday morning
        assert_eq!(s.next_opening(at(20, 18, 0)), Some(at(22, 9, 0)));
        // thursday lunch break -> afternoon shift
        assert_eq!(s.next_opening(at(22, 14, 0)), Some(at(22, 16, 0)));
        // saturday -> next monday
        assert_eq!(s.next_opening(at(24, 12, 0)), Some(at(26, 9, 0)));
    }

    #[test]
    fn test_next_opening_empty_schedule() {
        let s = WeeklySchedule::default();
        assert!(s.is_empty());
        assert_eq!(s.next_opening(at(19, 12, 0)), None);
        assert_eq!(
            s.status_at(at(19, 12, 0), Duration::minutes(30)),
            OpenStatus::Closed { next_opening: None }
        );
    }

    #[test]
    fn test_status_at() {
        let s = office_hours();
        let soon = Duration::minutes(30);
        assert_eq!(
            s.status_at(at(19, 10, 0), soon),
            OpenStatus::Open {
                closes_at: Some(at(19, 17, 0))
            }
        );
        assert_eq!(
            s.status_at(at(19, 16, 45), soon),
            OpenStatus::ClosingSoon {
                closes_at: at(19, 17, 0)
            }
        );
        assert_eq!(
            s.status_at(at(19, 17, 0), soon),
            OpenStatus::Closed {
                next_opening: Some(at(20, 9, 0))
            }
        );
    }

    #[test]
    fn test_always_open_venue_never_reports_closing() {
        let s = WeeklySchedule::from_value(&json!([
            "24h", "24h", "24h", "24h", "24h", "24h", "24h"
        ]))
        .unwrap();
        assert!(s.is_open(at(19, 23, 50)));
        assert_eq!(
            s.status_at(at(19, 23, 50), Duration::minutes(30)),
            OpenStatus::Open { closes_at: None }
        );
    }

    #[test]
    fn test_back_to_back_windows_are_chained() {
        let s = WeeklySchedule::from_value(&json!({
            "mon": "00:00-24:00",
            "tue": "00:00-03:00"
        }))
        .unwrap();
        assert_eq!(s.closes_at(at(19, 23, 50)), Some(at(20, 3, 0)));
        assert_eq!(
            s.status_at(at(19, 23, 50), Duration::minutes(30)),
            OpenStatus::Open {
                closes_at: Some(at(20, 3, 0))
            }
        );
    }

    #[test]
    fn test_overlapping_windows_close_at_the_latest_end() {
        let s = WeeklySchedule::from_value(&json!({"monday": "09:00-14:00, 12:00-18:00"}))
            .unwrap();
        assert_eq!(s.closes_at(at(19, 13, 45)), Some(at(19, 18, 0)));
        assert_eq!(
            s.status_at(at(19, 13, 45), Duration::minutes(30)),
            OpenStatus::Open {
                closes_at: Some(at(19, 18, 0))
            }
        );

        // a short window nested inside a long one
        let s = WeeklySchedule::from_value(&json!({"monday": "09:00-18:00, 10:00-12:00"}))
            .unwrap();
        assert_eq!(s.closes_at(at(19, 11, 0)), Some(at(19, 18, 0)));
    }

    #[test]
    fn test_overnight_spill_extends_early_window() {
        let s = WeeklySchedule::from_value(&json!({
            "monday": "22:00-04:00",
            "tuesday": "00:00-02:00"
        }))
        .unwrap();
        assert_eq!(s.closes_at(at(20, 1, 0)), Some(at(20, 4, 0)));
    }

    #[test]
    fn test_abbreviations_and_case() {
        let s = WeeklySchedule::from_value(&json!({"MON": "10:00-12:00", "Sun": "10:00-12:00"}))
            .unwrap();
        assert_eq!(s.windows_for(Weekday::Mon).len(), 1);
        assert_eq!(s.windows_for(Weekday::Sun).len(), 1);
    }

    #[test]
    fn test_double_encoded_string() {
        let raw = r#"{"monday":{"open":"09:00","close":"17:00"}}"#;
        let s = WeeklySchedule::from_value(&Value::String(raw.to_string())).unwrap();
        assert!(s.is_open(at(19, 10, 0)));

        let s = WeeklySchedule::from_json_str(raw).unwrap();
        assert!(s.is_open(at(19, 10, 0)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            WeeklySchedule::from_value(&json!({"funday": "10:00-12:00"})),
            Err(HoursError::UnknownDay("funday".to_string()))
        );
        assert_eq!(
            WeeklySchedule::from_value(&json!(["10:00-12:00"])),
            Err(HoursError::InvalidShape)
        );
        assert!(matches!(
            WeeklySchedule::from_value(&json!({"monday": {"open": "09:00"}})),
            Err(HoursError::InvalidEntry { .. })
        ));
        assert!(matches!(
            WeeklySchedule::from_value(&json!({"monday": "25:00-26:00"})),
            Err(HoursError::InvalidTime(_))
        ));
        assert_eq!(
            WeeklySchedule::from_value(&json!(42)),
            Err(HoursError::InvalidShape)
        );
    }

    #[test]
    fn test_canonical_serialization_roundtrips() {
        let s = office_hours();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["monday"], json!([{"open": "09:00", "close": "17:00"}]));
        assert_eq!(json["wednesday"], json!([]));
        assert_eq!(json["friday"][1], json!({"open": "20:00", "close": "02:00"}));

        let back: WeeklySchedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_end_of_day_serializes_as_24() {
        let s = WeeklySchedule::from_value(&json!({"monday": "18:00-24:00"})).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["monday"][0]["close"], "24:00");
    }

    #[test]
    fn test_open_status_serialization() {
        let status = OpenStatus::ClosingSoon {
            closes_at: at(19, 17, 0),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "closing_soon");
        assert_eq!(json["closes_at"], "2026-10-19T17:00:00");
    }
}
