//! String caster

use super::Strictness;
use crate::error::Result;
use crate::value::{self, format_float};
use serde_json::Value;

/// Cast a value to a string
///
/// Strict mode returns the value unchanged without checking its type; only
/// the input validator enforces strings on write.
///
/// Coercive mode: arrays become `""` when empty and their JSON encoding
/// otherwise; scalars use [`to_display_string`]; anything unconvertible
/// becomes `null`.
///
/// # Errors
///
/// Never fails; the `Result` keeps the caster signature uniform.
pub fn cast(value: Value, strictness: Strictness) -> Result<Value> {
    if strictness.is_strict() || value.is_null() {
        return Ok(value);
    }
    Ok(to_display_string(&value).map_or(Value::Null, Value::String))
}

/// Best-effort, locale-independent string conversion
///
/// Returns `None` for `null` and when the value cannot be encoded.
pub fn to_display_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i.to_string()),
            None if n.is_u64() => n.as_u64().map(|u| u.to_string()),
            None => n.as_f64().map(format_float),
        },
        Value::Array(_) | Value::Object(_) => {
            if value::is_empty_array(value) {
                Some(String::new())
            } else {
                serde_json::to_string(value).ok()
            }
        }
    }
}
