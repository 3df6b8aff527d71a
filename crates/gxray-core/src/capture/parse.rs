//! Field-level readers for HAR JSON.
//!
//! Each field is looked up on its own, so a value of an unexpected type only
//! loses that field and never the rest of the entry.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// String at JSON pointer `path`, if present and a string.
pub(super) fn str_at<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    value.pointer(path).and_then(Value::as_str)
}

/// Non-empty owned string at `path`.
pub(super) fn text_at(value: &Value, path: &str) -> Option<String> {
    str_at(value, path)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// HTTP status at `path`. Accepts integers, integral floats (`200.0`) and
/// numeric strings (`"200"`).
pub(super) fn status_at(value: &Value, path: &str) -> Option<u16> {
    match value.pointer(path)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|s| u16::try_from(s).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `startedDateTime`: RFC 3339, or an offset-less local-looking time read as UTC.
pub(super) fn timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(Utc.from_utc_datetime(&naive).into())
}
