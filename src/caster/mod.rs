//! Per-type value casters
//!
//! Each declared type has one caster. In [`Strictness::Coercive`] mode a caster
//! never fails: anything it cannot convert degrades to `null`. In
//! [`Strictness::Strict`] mode the value must already have the declared runtime
//! type (the string caster is the exception, see [`string::cast`]).
//!
//! `null` passes through every caster unchanged in both modes.
//!
//! ```
//! use typed_options::{DeclaredType, Strictness};
//! use serde_json::json;
//!
//! let value = DeclaredType::Integer.cast(json!("12.9"), Strictness::Coercive).unwrap();
//! assert_eq!(value, json!(12));
//!
//! let err = DeclaredType::Integer.cast(json!("12"), Strictness::Strict).unwrap_err();
//! assert!(err.is_type_error());
//! ```

pub mod array;
pub mod boolean;
pub mod integer;
pub mod number;
pub mod string;

use crate::error::{Error, Result};
use crate::value;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Declared Types
// =============================================================================

/// Type declared for an option in its schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    /// Text
    String,
    /// `true` / `false`
    #[serde(alias = "bool")]
    Boolean,
    /// Whole numbers only
    #[serde(alias = "int")]
    Integer,
    /// Integers or floats
    #[serde(alias = "float", alias = "double")]
    Number,
    /// List or associative array
    Array,
}

impl DeclaredType {
    /// Every declared type, in declaration order
    pub const ALL: [DeclaredType; 5] = [
        DeclaredType::String,
        DeclaredType::Boolean,
        DeclaredType::Integer,
        DeclaredType::Number,
        DeclaredType::Array,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredType::String => "string",
            DeclaredType::Boolean => "boolean",
            DeclaredType::Integer => "integer",
            DeclaredType::Number => "number",
            DeclaredType::Array => "array",
        }
    }

    /// Exact runtime-type match
    ///
    /// `Number` accepts integers and floats; `Array` accepts both list and map
    /// arrays. `null` never matches; callers let it through separately.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            DeclaredType::String => value.is_string(),
            DeclaredType::Boolean => value.is_boolean(),
            DeclaredType::Integer => value::is_integer(value),
            DeclaredType::Number => value.is_number(),
            DeclaredType::Array => value::is_array(value),
        }
    }

    /// Cast `value` to this type using the caster for the type
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] in strict mode when the runtime type differs.
    pub fn cast(&self, value: Value, strictness: Strictness) -> Result<Value> {
        match self {
            DeclaredType::String => string::cast(value, strictness),
            DeclaredType::Boolean => boolean::cast(value, strictness),
            DeclaredType::Integer => integer::cast(value, strictness),
            DeclaredType::Number => number::cast(value, strictness),
            DeclaredType::Array => array::cast(value, strictness),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclaredType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(DeclaredType::String),
            "boolean" | "bool" => Ok(DeclaredType::Boolean),
            "integer" | "int" => Ok(DeclaredType::Integer),
            "number" | "float" | "double" => Ok(DeclaredType::Number),
            "array" => Ok(DeclaredType::Array),
            other => Err(Error::Config(format!("Unknown option type '{other}'"))),
        }
    }
}

// =============================================================================
// Strictness
// =============================================================================

/// Casting mode, fixed per option at registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Best-effort conversion, degrades to `null`
    #[default]
    Coercive = 0,
    /// Exact runtime type required
    Strict = 1,
}

impl Strictness {
    pub fn is_strict(self) -> bool {
        self == Strictness::Strict
    }
}

impl From<bool> for Strictness {
    fn from(strict: bool) -> Self {
        if strict {
            Strictness::Strict
        } else {
            Strictness::Coercive
        }
    }
}

/// Shared strict-mode gate: `null` and exact matches pass, anything else fails
pub(crate) fn require_type(expected: DeclaredType, value: Value) -> Result<Value> {
    if value.is_null() || expected.matches(&value) {
        Ok(value)
    } else {
        Err(Error::type_mismatch(expected, &value))
    }
}

/// Cast with an explicit type and strictness
///
/// Free-function form of [`DeclaredType::cast`].
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] in strict mode when the runtime type differs.
pub fn cast(value: Value, declared: DeclaredType, strictness: Strictness) -> Result<Value> {
    declared.cast(value, strictness)
}

// =============================================================================
// Tests
// =============================================================================
