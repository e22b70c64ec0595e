//! Field coercions for loosely-typed backend payloads.
//!
//! The backend is not strict about types: ids arrive as numbers or strings,
//! prices as strings, image lists as JSON-encoded text. These helpers apply
//! the same coercions a browser client would, so every record comes out
//! in one shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Timestamp layouts accepted besides RFC 3339.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A fresh random identifier for records that arrive without one.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Truthiness of a decoded value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Stringify a value the way a browser would.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                // Array joins render null as an empty slot
                Value::Null => String::new(),
                other => to_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Numeric value of a decoded value; `NaN` when it has none.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => to_number(&Value::String(to_text(single))),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Identifier from a payload: present ids are stringified, missing ones generated.
pub fn identifier(value: Option<&Value>) -> String {
    match value {
        Some(v) if !v.is_null() => to_text(v),
        _ => fresh_id(),
    }
}

/// Required text field; falsy or missing values become empty.
pub fn text_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(v) => to_text(v),
        _ => String::new(),
    }
}

/// Optional text field; only null or missing values are dropped.
pub fn optional_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(v) if !v.is_null() => Some(to_text(v)),
        _ => None,
    }
}

/// Required numeric field; falsy, missing or non-numeric values become zero.
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    match value {
        Some(v) if is_truthy(v) => {
            let n = to_number(v);
            if n.is_finite() {
                n
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Optional numeric field; null, missing or non-numeric values are dropped.
pub fn optional_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(v) if !v.is_null() => Some(to_number(v)).filter(|n| n.is_finite()),
        _ => None,
    }
}

/// List of strings that may arrive as a native list or as JSON-encoded text.
///
/// Text that does not decode to a list is kept whole as a single element.
/// Returns `None` for values that are neither text nor a list.
pub fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => Some(items.iter().map(to_text).collect()),
            _ => Some(vec![s.clone()]),
        },
        Value::Array(items) => Some(items.iter().map(to_text).collect()),
        _ => None,
    }
}

/// Parse a timestamp from a payload field. Falsy, missing or unparsable values give `None`.
pub fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let value = value.filter(|v| is_truthy(v))?;
    parse_timestamp(&to_text(value))
}

/// Parse RFC 3339, naive date-times (taken as UTC), plain dates or epoch milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(millis) = raw.parse::<i64>() {
            return Utc.timestamp_millis_opt(millis).single();
        }
    }
    None
}
