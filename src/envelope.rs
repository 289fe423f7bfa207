//! Storage envelope: write-side sanitizer and read-side resolver
//!
//! Every value written to the store is wrapped as `{ "__marker": value }`.
//! The host store conflates "row holds `false`/`null`/empty" with "row absent";
//! the wrapper is never falsy, so a stored falsy value survives the round trip.
//!
//! ```
//! use typed_options::envelope::{resolve, sanitize};
//! use typed_options::{DeclaredType, Strictness};
//! use serde_json::json;
//!
//! let stored = sanitize(json!(false));
//! assert_eq!(stored, json!({ "__marker": false }));
//! assert_eq!(sanitize(stored.clone()), stored);
//!
//! let read = resolve(stored, DeclaredType::Boolean, Strictness::Strict).unwrap();
//! assert_eq!(read, json!(false));
//! ```

use crate::caster::{DeclaredType, Strictness};
use crate::error::Result;
use log::trace;
use serde_json::{Map, Value};

/// Reserved key marking an enveloped value
pub const MARKER: &str = "__marker";

/// Whether the value already wears the envelope
pub fn is_enveloped(value: &Value) -> bool {
    value.as_object().is_some_and(|map| map.contains_key(MARKER))
}

/// Wrap a value for storage
///
/// Idempotent: an enveloped value is returned unchanged.
pub fn sanitize(value: Value) -> Value {
    if is_enveloped(&value) {
        return value;
    }
    let mut envelope = Map::with_capacity(1);
    envelope.insert(MARKER.to_string(), value);
    Value::Object(envelope)
}

/// Take the logical value out of an envelope
///
/// Values without the envelope are returned unchanged.
pub fn unwrap(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(MARKER) => {
            map.remove(MARKER).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Borrowing form of [`unwrap`]
pub fn logical(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|map| map.get(MARKER))
        .unwrap_or(value)
}

/// Resolve a stored value into its declared type
///
/// Unwraps the envelope, short-circuits `null`, then dispatches to the caster.
///
/// # Errors
///
/// Propagates the caster's type mismatch in strict mode.
pub fn resolve(value: Value, declared: DeclaredType, strictness: Strictness) -> Result<Value> {
    let value = unwrap(value);
    if value.is_null() {
        return Ok(Value::Null);
    }
    trace!("Resolving {} value as {declared}", crate::value::kind(&value));
    declared.cast(value, strictness)
}

// =============================================================================
// Tests
// =============================================================================
