//! Best-effort canonicalization of user-entered dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse `raw` and render it as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Offsets are converted to UTC; zone-less inputs are taken as UTC and bare
/// dates as UTC midnight. Returns `None` when nothing matches.
pub fn to_iso8601(raw: &str) -> Option<String> {
    parse_utc(raw.trim()).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// `to_iso8601` or the input unchanged.
pub fn normalize(raw: &str) -> String {
    to_iso8601(raw).unwrap_or_else(|| raw.to_string())
}

fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}
