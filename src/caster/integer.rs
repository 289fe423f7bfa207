//! Integer caster

use super::{DeclaredType, Strictness, require_type};
use crate::error::Result;
use crate::value::{Numeric, parse_numeric};
use serde_json::Value;

/// Cast a value to an integer
///
/// Coercive mode: booleans map to `0`/`1`, floats and numeric strings are
/// truncated toward zero. Arrays, non-numeric strings and floats outside the
/// `i64` range become `null`. Integer strings beyond the `i64` range are read
/// as floats and follow the same rule, so they become `null` rather than
/// saturating.
///
/// # Errors
///
/// Returns a type mismatch in strict mode for non-integer values, floats included.
pub fn cast(value: Value, strictness: Strictness) -> Result<Value> {
    if strictness.is_strict() {
        return require_type(DeclaredType::Integer, value);
    }
    Ok(coerce(value))
}

fn coerce(value: Value) -> Value {
    match value {
        Value::Bool(b) => Value::from(i64::from(b)),
        Value::Number(n) if n.is_f64() => n.as_f64().map_or(Value::Null, truncate),
        Value::Number(n) => Value::Number(n),
        Value::String(s) => match parse_numeric(&s) {
            Some(Numeric::Int(i)) => Value::from(i),
            Some(Numeric::Float(f)) => truncate(f),
            None => Value::Null,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => Value::Null,
    }
}

fn truncate(f: f64) -> Value {
    let t = f.trunc();
    if t.is_finite() && t > i64::MIN as f64 && t < i64::MAX as f64 {
        Value::from(t as i64)
    } else {
        Value::Null
    }
}
