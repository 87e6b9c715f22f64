use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Naive layouts read as local wall-clock time.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parses an observation timestamp into local wall-clock time.
///
/// Offset-bearing timestamps (RFC 3339, RFC 2822) are converted to the local
/// zone; naive date-times are taken as already local. A bare ISO date means
/// UTC midnight.
pub fn parse_local(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight).with_timezone(&Local).naive_local())
}

/// Local hour-of-day (0–23) of a timestamp, or `None` if it does not parse.
pub fn hour_of_day(raw: &str) -> Option<u32> {
    parse_local(raw).map(|t| t.hour())
}

/// The current local hour-of-day.
pub fn current_hour() -> u32 {
    Local::now().hour()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_iso() {
        assert_eq!(hour_of_day("2024-01-01T10:15:00"), Some(10));
        assert_eq!(hour_of_day("2024-01-01T23:59:59.250"), Some(23));
    }

    #[test]
    fn test_space_separated_and_short_forms() {
        assert_eq!(hour_of_day("2024-01-01 07:30:00"), Some(7));
        assert_eq!(hour_of_day("2024-01-01 07:30"), Some(7));
        assert_eq!(hour_of_day("2024/01/01 18:05"), Some(18));
    }

    #[test]
    fn test_offset_timestamps_parse() {
        assert!(hour_of_day("2024-01-01T10:15:00Z").is_some());
        assert!(hour_of_day("2024-01-01T10:15:00+02:00").is_some());
        assert!(hour_of_day("Mon, 01 Jan 2024 10:15:00 +0000").is_some());
    }

    #[test]
    fn test_date_only_parses() {
        assert!(parse_local("2024-01-01").is_some());
    }

    #[test]
    fn test_invalid() {
        assert_eq!(hour_of_day("not-a-date"), None);
        assert_eq!(hour_of_day(""), None);
        assert_eq!(hour_of_day("2024-13-01T10:00:00"), None);
    }

    #[test]
    fn test_current_hour_in_range() {
        assert!(current_hour() < 24);
    }
}
