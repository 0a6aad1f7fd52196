// src/util/text.rs
use chrono::{DateTime, Local, NaiveDateTime};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a server timestamp for display.
///
/// RFC 3339 values (with offset) are shown in local time; naive ISO values are
/// shown as they are. Missing or unparseable input yields an empty string.
///
/// # Examples
///
/// ```
/// use simple_notes::util::text::format_timestamp;
///
/// assert_eq!(format_timestamp(Some("2024-03-05T14:07:09.123456")), "2024-03-05 14:07:09");
/// assert_eq!(format_timestamp(Some("not a date")), "");
/// ```
pub fn format_timestamp(ts: Option<&str>) -> String {
    let Some(ts) = ts.map(str::trim).filter(|t| !t.is_empty()) else {
        return String::new();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// First non-empty line of `text`, trimmed and cut to `max_chars` characters.
///
/// Cut text ends with an ellipsis.
pub fn single_line(text: &str, max_chars: usize) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
