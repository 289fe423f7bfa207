//! Declarative option definitions
//!
//! Schemas can be loaded from JSON instead of built in code:
//!
//! ```rust
//! use typed_options::config::schemas_from_json;
//! use typed_options::DeclaredType;
//!
//! let schemas = schemas_from_json(r#"{
//!     "site_title": { "type": "string", "default": "My Site" },
//!     "posts_per_page": { "type": "integer", "strict": true, "min": 1 }
//! }"#).unwrap();
//!
//! assert_eq!(schemas[0].name(), "site_title");
//! assert_eq!(schemas[1].declared_type(), DeclaredType::Integer);
//! ```

use super::schema::{DEFAULT_PRIORITY, OptionSchema, StoreScope};
use crate::caster::{DeclaredType, Strictness};
use crate::error::{Error, Result};
use crate::validator::Constraint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Serde form of an [`OptionSchema`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionDefinition {
    /// Declared type name; required
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub option_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default)]
    pub strict: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(default)]
    pub scope: StoreScope,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Regex pattern for string values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Allowed values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl OptionDefinition {
    /// Build the schema for option `name`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the type is missing or unknown, the pattern
    /// is invalid, or the resulting schema fails [`OptionSchema::validate_schema`].
    pub fn into_schema(self, name: impl Into<String>) -> Result<OptionSchema> {
        let name = name.into();
        let declared: DeclaredType = self
            .option_type
            .as_deref()
            .ok_or_else(|| Error::Config(format!("Option '{name}' does not declare a type")))?
            .parse()?;

        let mut schema = OptionSchema::new(name, declared)
            .with_strictness(Strictness::from(self.strict))
            .with_priority(self.priority.unwrap_or(DEFAULT_PRIORITY))
            .with_scope(self.scope);

        if let Some(default) = self.default {
            schema = schema.with_default(default);
        }
        if let Some(min) = self.min {
            schema = schema.with_constraint(Constraint::min(min));
        }
        if let Some(max) = self.max {
            schema = schema.with_constraint(Constraint::max(max));
        }
        if let Some(pattern) = self.pattern.as_deref() {
            schema = schema.with_constraint(Constraint::pattern(pattern)?);
        }
        if let Some(options) = self.options {
            schema = schema.with_constraint(Constraint::one_of(options));
        }
        if let Some(limit) = self.max_items {
            schema = schema.with_constraint(Constraint::max_items(limit));
        }

        schema.validate_schema()?;
        Ok(schema)
    }
}

/// Parse a JSON object of `name -> definition` into schemas, in document order
///
/// # Errors
///
/// Returns [`Error::Serialize`] for malformed JSON and [`Error::Config`] for
/// invalid definitions.
pub fn schemas_from_json(json: &str) -> Result<Vec<OptionSchema>> {
    let entries: Map<String, Value> = serde_json::from_str(json)?;
    entries
        .into_iter()
        .map(|(name, raw)| {
            let definition: OptionDefinition = serde_json::from_value(raw)
                .map_err(|e| Error::Config(format!("Invalid definition for '{name}': {e}")))?;
            definition.into_schema(name)
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
