//! Lenient parsing of provider-supplied numbers and timestamps
//!
//! Providers hand us display text, not typed values. Numbers may carry
//! thousands separators or trailing units; timestamps come in whatever format
//! the page or API happens to render. Parsing never fails hard: unreadable
//! numbers become `0.0` and unreadable timestamps become `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried in order, after zone suffixes are stripped
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
    "%d %b %Y, %H:%M:%S",
    "%b %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts, read as midnight UTC
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%d %B %Y", "%m/%d/%Y"];

/// Parses a number the way a display cell is usually written
///
/// Surrounding whitespace and `,` thousands separators are ignored. If the
/// whole string is not a number, its longest numeric prefix is used
/// (`"12.5 s"` reads as `12.5`); with no numeric prefix at all the result is
/// `0.0`. Non-finite results also collapse to `0.0`.
///
/// # Example
///
/// ```
/// use boinc_ingest::normalize::parse_float;
///
/// assert_eq!(parse_float(" 19,857.06 "), 19857.06);
/// assert_eq!(parse_float("45.2 credits"), 45.2);
/// assert_eq!(parse_float("---"), 0.0);
/// ```
pub fn parse_float(raw: &str) -> f64 {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();

    let value = cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .or_else(|| numeric_prefix(&cleaned).parse::<f64>().ok());

    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Returns the longest leading `[+-]digits[.digits][e[+-]digits]` slice
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start || &s[digits_start..end] == "." {
        return "";
    }

    // Only take an exponent when digits follow it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Parses a provider date/time string into a Unix timestamp (seconds)
///
/// Strings with an explicit offset (RFC 3339, RFC 2822) honour it. Everything
/// else is read as UTC after dropping a trailing `UTC`/`GMT`/`Z` marker and any
/// `|` separators the task pages put between date and time.
///
/// Returns `None` if no known layout matches.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.timestamp());
    }

    let cleaned = clean_date_text(trimmed);

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&cleaned, format) {
            return Some(naive.and_utc().timestamp());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc().timestamp());
        }
    }

    None
}

fn clean_date_text(raw: &str) -> String {
    let mut text = raw.replace('|', " ");

    for suffix in [" UTC", " GMT", "Z"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            text = stripped.to_string();
            break;
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
