//! Accessors for loosely-typed upstream JSON
//!
//! The mirror's title documents are inconsistent about field names and
//! types. Lookups go through ordered priority lists and treat a value as
//! present only when it is "truthy": not null, not `false`, not `0` and not
//! an empty string.

use serde_json::Value;

/// Season fields that may carry the episode count, in priority order
pub const EPISODE_COUNT_FIELDS: [&str; 9] = [
    "ep_count",
    "total_episodes",
    "episode_count",
    "eps",
    "epCount",
    "episodes_count",
    "episode_count_total",
    "totalEpisodes",
    "count",
];

/// Season id fields
pub const SEASON_ID_FIELDS: [&str; 2] = ["id", "sid"];

/// Season number fields
pub const SEASON_NUMBER_FIELDS: [&str; 2] = ["num", "number"];

/// Cast fields, short list preferred
pub const CAST_FIELDS: [&str; 2] = ["short_cast", "cast"];

/// Whether a value counts as present
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First truthy value among `fields` of `object`
pub fn first_present<'a>(object: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| object.get(field))
        .find(|value| is_truthy(value))
}

/// Truthy value of a single field
pub fn present<'a>(object: &'a Value, field: &str) -> Option<&'a Value> {
    first_present(object, &[field])
}

/// Render a scalar the way it would be printed as text
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truthy field rendered as text, or `default`
pub fn text_or(object: &Value, field: &str, default: &str) -> String {
    present(object, field).map_or_else(|| default.to_string(), to_text)
}

/// Leading decimal integer of a value's text form, like `"12 episodes"` -> 12
pub fn leading_int(value: &Value) -> Option<i64> {
    let text = to_text(value);
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
