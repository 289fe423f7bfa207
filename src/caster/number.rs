//! Number caster (integers and floats)

use super::{DeclaredType, Strictness, require_type};
use crate::error::Result;
use crate::value::parse_numeric;
use serde_json::Value;

/// Cast a value to a number
///
/// Coercive mode: booleans map to integer `0`/`1`, numbers pass through and
/// numeric strings keep their literal form (`"3"` -> `3`, `"3.5"` -> `3.5`).
/// Non-numeric strings and arrays become `null`.
///
/// # Errors
///
/// Returns a type mismatch in strict mode for non-numeric values.
pub fn cast(value: Value, strictness: Strictness) -> Result<Value> {
    if strictness.is_strict() {
        return require_type(DeclaredType::Number, value);
    }
    Ok(match value {
        Value::Bool(b) => Value::from(i64::from(b)),
        Value::Number(_) => value,
        Value::String(s) => parse_numeric(&s)
            .and_then(|n| n.into_value())
            .unwrap_or(Value::Null),
        Value::Null | Value::Array(_) | Value::Object(_) => Value::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::is_integer;
    use serde_json::json;

    fn coerce(value: Value) -> Value {
        cast(value, Strictness::Coercive).unwrap()
    }

    #[test]
    fn test_coercion() {
        assert_eq!(coerce(json!(true)), json!(1));
        assert_eq!(coerce(json!(4)), json!(4));
        assert_eq!(coerce(json!(4.25)), json!(4.25));
        assert_eq!(coerce(json!("3.5")), json!(3.5));
        assert_eq!(coerce(json!("nope")), json!(null));
        assert_eq!(coerce(json!(["1"])), json!(null));
    }

    #[test]
    fn test_string_literal_form_is_kept() {
        assert!(is_integer(&coerce(json!("3"))));
        assert!(!is_integer(&coerce(json!("3.0"))));
    }

    #[test]
    fn test_strict_accepts_both_numeric_kinds() {
        assert_eq!(cast(json!(1), Strictness::Strict).unwrap(), json!(1));
        assert_eq!(cast(json!(1.5), Strictness::Strict).unwrap(), json!(1.5));
        assert!(cast(json!("1"), Strictness::Strict).is_err());
        assert!(cast(json!(true), Strictness::Strict).is_err());
    }
}
