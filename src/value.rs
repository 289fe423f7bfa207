//! Runtime helpers over option values
//!
//! Option values are plain [`serde_json::Value`]s. A list array is a
//! `Value::Array`, an associative array is a `Value::Object`; both report the
//! runtime kind `"array"`.

use serde_json::{Number, Value};

/// A parsed numeric literal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Convert into a JSON number value
    ///
    /// Returns `None` for floats JSON cannot carry (never produced by [`parse_numeric`]).
    pub fn into_value(self) -> Option<Value> {
        match self {
            Numeric::Int(n) => Some(Value::from(n)),
            Numeric::Float(f) => Number::from_f64(f).map(Value::Number),
        }
    }
}

/// Runtime kind name of a value, as reported in type errors
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) => "array",
    }
}

/// Whether the value is an integer number (signed or unsigned)
pub fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Number(n) if !n.is_f64())
}

/// Whether the value is an array of either shape (list or map)
pub fn is_array(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Whether the value is an array with no elements
pub fn is_empty_array(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Standard truthiness
///
/// Falsy: `null`, `false`, `0`, `0.0`, `""`, `"0"` and empty arrays.
/// Everything else, negative numbers included, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i != 0
            } else if let Some(u) = n.as_u64() {
                u != 0
            } else {
                n.as_f64().is_some_and(|f| f != 0.0)
            }
        }
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(_) | Value::Object(_) => !is_empty_array(value),
    }
}

/// Parse a numeric string literal
///
/// Surrounding whitespace is ignored. Integer literals that fit in `i64` become
/// [`Numeric::Int`]; decimal and exponent forms become [`Numeric::Float`].
/// Words such as `inf` or `nan`, hex literals and non-finite results are rejected.
pub fn parse_numeric(input: &str) -> Option<Numeric> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Numeric::Int(n));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Numeric::Float)
}

/// Locale-independent float formatting
///
/// Integral values print without a fractional part (`1.0` -> `"1"`).
/// Magnitudes of `1e15` and above, or below `1e-4`, use the shortest exponent
/// form (`1e300`, `1e-7`).
pub fn format_float(f: f64) -> String {
    let magnitude = f.abs();
    if f.is_finite() && f.fract() == 0.0 && magnitude < 1e15 {
        format!("{}", f as i64)
    } else if magnitude >= 1e15 || (magnitude != 0.0 && magnitude < 1e-4) {
        format!("{f:e}")
    } else {
        format!("{f}")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(kind(&json!(null)), "null");
        assert_eq!(kind(&json!(true)), "boolean");
        assert_eq!(kind(&json!(3)), "integer");
        assert_eq!(kind(&json!(3.5)), "float");
        assert_eq!(kind(&json!("x")), "string");
        assert_eq!(kind(&json!([1])), "array");
        assert_eq!(kind(&json!({"a": 1})), "array");
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(0.1)));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!([0])));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!(null)));
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("42"), Some(Numeric::Int(42)));
        assert_eq!(parse_numeric(" -7 "), Some(Numeric::Int(-7)));
        assert_eq!(parse_numeric("1.5"), Some(Numeric::Float(1.5)));
        assert_eq!(parse_numeric("1e3"), Some(Numeric::Float(1000.0)));
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("0x1A"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(-2.0), "-2");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(0.0001), "0.0001");
    }

    #[test]
    fn test_format_float_exponent_range() {
        assert_eq!(format_float(1e300), "1e300");
        assert_eq!(format_float(1.5e20), "1.5e20");
        assert_eq!(format_float(1e15), "1e15");
        assert_eq!(format_float(1e-7), "1e-7");
        assert_eq!(format_float(-2.5e-5), "-2.5e-5");
        assert_eq!(format_float(999_999_999_999_999.0), "999999999999999");
    }
}
