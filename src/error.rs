//! Error types for typed-options

use crate::caster::DeclaredType;
use thiserror::Error;

/// Result type alias for typed-options operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for typed-options
///
/// None of these are transient: type and constraint failures are caller or
/// programmer errors and are surfaced to the caller of the read/write as-is.
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Type Errors
    // -------------------------------------------------------------------------
    /// Strict-mode caster or input validator saw a value of the wrong runtime kind
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: DeclaredType,
        actual: String,
    },

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    /// A registered constraint rejected the value; the message is the constraint's own
    #[error("{message}")]
    Constraint { message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Build a type mismatch for `value` against `expected`
    pub(crate) fn type_mismatch(expected: DeclaredType, value: &serde_json::Value) -> Self {
        Error::TypeMismatch {
            expected,
            actual: crate::value::kind(value).to_string(),
        }
    }

    /// Check if this is a runtime type error
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }

    /// Check if this is a constraint failure
    #[must_use]
    pub fn is_constraint_error(&self) -> bool {
        matches!(self, Error::Constraint { .. })
    }

    /// Check if this is a registration-time configuration error
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

// =============================================================================
// Tests
// =============================================================================
