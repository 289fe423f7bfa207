//! Boolean caster

use super::{DeclaredType, Strictness, require_type};
use crate::error::Result;
use crate::value::is_truthy;
use serde_json::Value;

/// Cast a value to a boolean
///
/// Coercive mode applies standard truthiness, so `-1` is `true` and `[]` is
/// `false`. `null` stays `null` so an unset option is never reported as `false`.
///
/// # Errors
///
/// Returns a type mismatch in strict mode for non-boolean values.
pub fn cast(value: Value, strictness: Strictness) -> Result<Value> {
    if strictness.is_strict() {
        return require_type(DeclaredType::Boolean, value);
    }
    if value.is_null() {
        return Ok(Value::Null);
    }
    Ok(Value::Bool(is_truthy(&value)))
}
