//! Calendar-day helpers for ISO-8601 date strings.
//!
//! Items and wear events store dates as strings exactly as they were
//! supplied (`2024-05-01` from a date picker or a full
//! `2024-05-01T08:30:00.000Z` timestamp). Aggregation only ever looks at
//! the calendar day written in that string; time of day is ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};
use std::fmt::Display;

const DATE_FORMAT: &str = "%Y-%m-%d";
const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses the calendar day out of an ISO-8601 date or date-time string.
///
/// Offsets are not normalized to UTC: `2024-05-01T23:30:00-05:00` is
/// May 1st, matching the day the user saw when recording it.
///
/// Returns `None` for anything that is not a recognizable ISO-8601 shape.
pub fn parse_calendar_day(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.date_naive());
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, LOCAL_DATE_TIME_FORMAT) {
        return Some(local.date());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

/// Formats an instant as a millisecond-precision timestamp in its own
/// offset (`2024-05-01T21:00:00.000-04:00`, or `...Z` for UTC).
///
/// The written day is the one seen in `instant`'s zone, which is what
/// [`parse_calendar_day`] reads back.
pub fn iso_timestamp<Tz>(instant: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats a calendar day as `YYYY-MM-DD`.
pub fn iso_day(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{iso_day, iso_timestamp, parse_calendar_day};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_dates_and_timestamps() {
        assert_eq!(parse_calendar_day("2024-05-01"), Some(day(2024, 5, 1)));
        assert_eq!(
            parse_calendar_day("2024-05-01T08:30:00.000Z"),
            Some(day(2024, 5, 1))
        );
        assert_eq!(
            parse_calendar_day(" 2024-05-01T08:30:00 "),
            Some(day(2024, 5, 1))
        );
    }

    #[test]
    fn keeps_the_written_day_for_offset_timestamps() {
        assert_eq!(
            parse_calendar_day("2024-05-01T23:30:00-05:00"),
            Some(day(2024, 5, 1))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_calendar_day(""), None);
        assert_eq!(parse_calendar_day("yesterday"), None);
        assert_eq!(parse_calendar_day("2024-13-40"), None);
    }

    #[test]
    fn formats_in_iso_shapes() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(iso_timestamp(instant), "2024-05-01T08:30:00.000Z");
        assert_eq!(iso_day(day(2024, 5, 1)), "2024-05-01");
    }

    #[test]
    fn evening_west_of_utc_stays_on_the_local_day() {
        let new_york = FixedOffset::west_opt(4 * 3600).unwrap();
        let evening = new_york.with_ymd_and_hms(2024, 5, 1, 21, 0, 0).unwrap();

        let stamped = iso_timestamp(evening);

        assert_eq!(stamped, "2024-05-01T21:00:00.000-04:00");
        assert_eq!(parse_calendar_day(&stamped), Some(day(2024, 5, 1)));
    }
}
