// ABOUTME: Date helpers for workout records and user profiles
// ABOUTME: Rounds record timestamps to 30-minute slots and parses client date formats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::errors::{AppError, AppResult};

/// Format of the `datetime` query parameter on record endpoints (`2024-05-01_18-30`)
pub const RECORD_DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// Birthday format sent by the sign-up form
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Round a timestamp down to the start of its 30-minute slot
#[must_use]
pub fn to_30_min_interval(datetime: DateTime<Utc>) -> DateTime<Utc> {
    let minute = if datetime.minute() <= 29 { 0 } else { 30 };
    datetime
        .with_minute(minute)
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(datetime)
}

/// Parse a record timestamp in `yyyy-MM-dd_HH-mm` form
///
/// # Errors
///
/// Returns `INVALID_FORMAT` if the string does not match
pub fn parse_record_datetime(value: &str) -> AppResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), RECORD_DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            AppError::invalid_format(format!(
                "Invalid datetime '{value}', expected yyyy-MM-dd_HH-mm: {e}"
            ))
        })
}

/// Resolve the slot for an optional `datetime` parameter, defaulting to now
///
/// # Errors
///
/// Returns `INVALID_FORMAT` if a value is given and cannot be parsed
pub fn record_slot(datetime: Option<&str>) -> AppResult<DateTime<Utc>> {
    let instant = match datetime.filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_record_datetime(raw)?,
        None => Utc::now(),
    };
    Ok(to_30_min_interval(instant))
}

/// Format a record timestamp back into `yyyy-MM-dd_HH-mm`
#[must_use]
pub fn format_record_datetime(datetime: DateTime<Utc>) -> String {
    datetime.format(RECORD_DATETIME_FORMAT).to_string()
}

/// Parse a birthday given as `MM/dd/yyyy` or ISO `yyyy-MM-dd`
///
/// # Errors
///
/// Returns `INVALID_FORMAT` if neither format matches
pub fn parse_birthday(value: &str) -> AppResult<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| {
            AppError::invalid_format(format!(
                "Invalid date '{value}', expected MM/dd/yyyy or yyyy-MM-dd"
            ))
        })
}

/// Format a date as `MM/dd/yyyy`
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rounds_down_to_half_hour() {
        let early = Utc.with_ymd_and_hms(2024, 5, 1, 18, 29, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 1).unwrap();

        assert_eq!(
            to_30_min_interval(early),
            Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap()
        );
        assert_eq!(
            to_30_min_interval(late),
            Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_record_datetime() {
        let parsed = parse_record_datetime("2024-05-01_07-45").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 7, 45, 0).unwrap());
        assert_eq!(format_record_datetime(parsed), "2024-05-01_07-45");

        assert!(parse_record_datetime("05/01/2024").is_err());
    }

    #[test]
    fn test_record_slot_defaults_to_now() {
        let slot = record_slot(None).unwrap();
        assert!(slot.minute() == 0 || slot.minute() == 30);
        assert_eq!(slot.second(), 0);

        let slot = record_slot(Some("2024-05-01_07-45")).unwrap();
        assert_eq!(slot, Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_birthday_formats() {
        let expected = NaiveDate::from_ymd_opt(1990, 2, 14).unwrap();
        assert_eq!(parse_birthday("02/14/1990").unwrap(), expected);
        assert_eq!(parse_birthday("1990-02-14").unwrap(), expected);
        assert_eq!(format_date(expected), "02/14/1990");
        assert!(parse_birthday("Feb 14").is_err());
    }
}
