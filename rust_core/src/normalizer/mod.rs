//! Cricbuzz payload normalization
//!
//! Turns the untyped, schema-inconsistent JSON trees returned by the Cricbuzz
//! API into the flat records in [`crate::models`]:
//! - [`extract_matches`]: every live match found anywhere in a payload
//! - [`shape_live_score`]: one match's score snapshot
//! - [`shape_scorecard`]: per-player batting and bowling rows
//!
//! Every field read is get-or-default. Missing keys, wrong nesting and wrong
//! value types resolve to defaults and never to an error. All functions here
//! are pure apart from the wall-clock stamp in [`shape_live_score`].

use serde_json::{Map, Value};

pub mod live_score;
pub mod matches;
pub mod scorecard;

pub use live_score::shape_live_score;
pub use matches::extract_matches;
pub use scorecard::shape_scorecard;

/// Depth-first pre-order walk over every object in `node`.
///
/// `visit` sees an object before any of its descendants. Arrays are walked
/// element by element; scalars contribute nothing.
pub fn walk<'a, F>(node: &'a Value, visit: &mut F)
where
    F: FnMut(&'a Map<String, Value>),
{
    match node {
        Value::Object(map) => {
            visit(map);
            for child in map.values() {
                if child.is_object() || child.is_array() {
                    walk(child, visit);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, visit);
            }
        }
        _ => {}
    }
}

/// Returns the message of an upstream error sentinel: an object whose
/// `error` entry is truthy.
pub fn fetch_error(payload: &Value) -> Option<String> {
    let error = payload.as_object()?.get("error")?;
    if !is_truthy(error) {
        return None;
    }
    Some(match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Truthiness of a JSON value: null, false, zero, empty string, empty array
/// and empty object are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text of a scalar field; strings verbatim, numbers and booleans rendered.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn text_or(value: &Value, default: &str) -> String {
    text(value).unwrap_or_else(|| default.to_string())
}

/// Integer field. Floats truncate; numeric strings are parsed.
pub(crate) fn int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

pub(crate) fn int_or_zero(value: &Value) -> i64 {
    int(value).unwrap_or(0)
}

pub(crate) fn float_or_zero(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Field rendered for display, `default` when absent or null.
pub(crate) fn display_or(value: &Value, default: &str) -> String {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => default.to_string(),
        other => text_or(other, default),
    }
}
