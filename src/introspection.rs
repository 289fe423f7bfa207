//! REST-introspection schema fragments
//!
//! Derives a JSON-schema style fragment for each option from its declared
//! type and default, for hosts that expose options over a REST API.

use crate::caster::DeclaredType;
use crate::config::OptionSchema;
use serde_json::{Map, Value, json};

/// JSON-schema type name of a value
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn declared_json_type(declared: DeclaredType) -> &'static str {
    match declared {
        DeclaredType::String => "string",
        DeclaredType::Boolean => "boolean",
        DeclaredType::Integer => "integer",
        DeclaredType::Number => "number",
        DeclaredType::Array => "array",
    }
}

/// Schema fragment for one option
///
/// ```rust
/// use typed_options::{OptionSchema, rest_schema};
/// use serde_json::json;
///
/// let schema = OptionSchema::array("limits").with_default(json!({ "posts": 10, "label": "x" }));
/// assert_eq!(
///     rest_schema(&schema),
///     json!({
///         "type": "object",
///         "properties": {
///             "posts": { "type": "integer" },
///             "label": { "type": "string" }
///         },
///         "default": { "posts": 10, "label": "x" }
///     })
/// );
/// ```
#[must_use]
pub fn rest_schema(schema: &OptionSchema) -> Value {
    let default = schema
        .resolved_default()
        .ok()
        .filter(|value| !value.is_null());

    let mut fragment = Map::new();
    match (schema.declared_type(), &default) {
        (DeclaredType::Array, Some(Value::Object(entries))) => {
            fragment.insert("type".into(), json!("object"));
            let properties: Map<String, Value> = entries
                .iter()
                .map(|(key, value)| (key.clone(), json!({ "type": json_type(value) })))
                .collect();
            fragment.insert("properties".into(), Value::Object(properties));
        }
        (DeclaredType::Array, Some(Value::Array(items))) => {
            fragment.insert("type".into(), json!("array"));
            if let Some(first) = items.first() {
                let kind = json_type(first);
                if items.iter().all(|item| json_type(item) == kind) {
                    fragment.insert("items".into(), json!({ "type": kind }));
                }
            }
        }
        (declared, _) => {
            fragment.insert("type".into(), json!(declared_json_type(declared)));
        }
    }

    if let Some(default) = default {
        fragment.insert("default".into(), default);
    }
    Value::Object(fragment)
}

// =============================================================================
// Tests
// =============================================================================
