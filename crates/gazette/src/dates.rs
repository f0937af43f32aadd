//! Date parsing and formatting for publish and update dates.
//!
//! The API is not consistent in how it serializes dates, so every helper accepts the raw string and returns an
//! empty string (or `false`) when it cannot make sense of it.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const TIME_UNITS: [(&str, i64); 6] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

/// Parses RFC 3339 timestamps, ISO local date-times and plain dates. Timestamps with an offset are converted to UTC.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Utc).naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date_time);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// "January 15, 2024"
pub fn format_date(value: &str) -> String {
    format_with(value, "%B %-d, %Y")
}

/// "Jan 15, 2024"
pub fn format_date_short(value: &str) -> String {
    format_with(value, "%b %-d, %Y")
}

/// "10:30 AM"
pub fn format_time(value: &str) -> String {
    format_with(value, "%I:%M %p")
}

/// "January 15, 2024 at 10:30 AM"
pub fn format_date_time(value: &str) -> String {
    match parse_date(value) {
        Some(_) => format!("{} at {}", format_date(value), format_time(value)),
        None => String::new(),
    }
}

/// "YYYY-MM-DD", as used in sitemaps.
pub fn format_iso_date(value: &str) -> Option<String> {
    parse_date(value).map(|date| date.format("%Y-%m-%d").to_string())
}

/// Describes how long ago `value` was relative to `now`, e.g. "3 days ago".
pub fn relative_time(value: &str, now: NaiveDateTime) -> String {
    let Some(date) = parse_date(value) else {
        return String::new();
    };

    let elapsed = (now - date).num_seconds();

    for (unit, seconds) in TIME_UNITS {
        let interval = elapsed / seconds;
        if interval >= 1 {
            let plural = if interval == 1 { "" } else { "s" };
            return format!("{} {}{} ago", interval, unit, plural);
        }
    }

    "Just now".to_string()
}

pub fn is_today(value: &str, now: NaiveDateTime) -> bool {
    parse_date(value).is_some_and(|date| date.date() == now.date())
}

/// Whether `value` falls within the seven days leading up to `now`.
pub fn is_this_week(value: &str, now: NaiveDateTime) -> bool {
    parse_date(value).is_some_and(|date| date >= now - chrono::Duration::days(7) && date <= now)
}

fn format_with(value: &str, format: &str) -> String {
    parse_date(value)
        .map(|date| date.format(format).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> NaiveDateTime {
        parse_date(value).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            at("2024-01-15T10:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
        assert_eq!(at("2024-01-15T10:30:00.123"), at("2024-01-15T10:30:00.123Z"));
        assert_eq!(at("2024-01-15T12:30:00+02:00"), at("2024-01-15T10:30:00"));
        assert_eq!(at("2024-01-15"), at("2024-01-15T00:00:00"));
        assert_eq!(at("2024-01-15 10:30:00"), at("2024-01-15T10:30:00"));
        assert!(parse_date("").is_none());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-05T10:30:00"), "January 5, 2024");
        assert_eq!(format_date_short("2024-01-05T10:30:00"), "Jan 5, 2024");
        assert_eq!(format_time("2024-01-05T14:05:00"), "02:05 PM");
        assert_eq!(
            format_date_time("2024-01-05T09:15:00"),
            "January 5, 2024 at 09:15 AM"
        );
        assert_eq!(format_date("not a date"), "");
        assert_eq!(format_date_time(""), "");
        assert_eq!(format_iso_date("2024-01-05T09:15:00Z").as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn test_relative_time() {
        let now = at("2024-06-15T12:00:00");

        assert_eq!(relative_time("2024-06-15T11:59:30", now), "Just now");
        assert_eq!(relative_time("2024-06-15T11:59:00", now), "1 minute ago");
        assert_eq!(relative_time("2024-06-15T09:00:00", now), "3 hours ago");
        assert_eq!(relative_time("2024-06-14T12:00:00", now), "1 day ago");
        assert_eq!(relative_time("2024-06-01T12:00:00", now), "2 weeks ago");
        assert_eq!(relative_time("2024-03-15T12:00:00", now), "3 months ago");
        assert_eq!(relative_time("2022-06-15T12:00:00", now), "2 years ago");
        assert_eq!(relative_time("garbage", now), "");
    }

    #[test]
    fn test_is_today_and_this_week() {
        let now = at("2024-06-15T12:00:00");

        assert!(is_today("2024-06-15T00:01:00", now));
        assert!(!is_today("2024-06-14T23:59:00", now));

        assert!(is_this_week("2024-06-09T12:00:00", now));
        assert!(is_this_week("2024-06-15T12:00:00", now));
        assert!(!is_this_week("2024-06-08T11:59:00", now));
        assert!(!is_this_week("2024-06-16T00:00:00", now));
        assert!(!is_this_week("", now));
    }
}
