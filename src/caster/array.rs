//! Array caster

use super::{DeclaredType, Strictness, require_type};
use crate::error::Result;
use serde_json::Value;

/// Cast a value to an array
///
/// Coercive mode wraps any scalar as a single-element list. Arrays of either
/// shape pass through untouched, and `null` stays `null`.
///
/// # Errors
///
/// Returns a type mismatch in strict mode for scalar values.
pub fn cast(value: Value, strictness: Strictness) -> Result<Value> {
    if strictness.is_strict() {
        return require_type(DeclaredType::Array, value);
    }
    Ok(match value {
        Value::Null | Value::Array(_) | Value::Object(_) => value,
        scalar => Value::Array(vec![scalar]),
    })
}
