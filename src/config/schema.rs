//! Option schema and its builder
//!
//! # Overview
//!
//! An [`OptionSchema`] declares how one stored option is typed:
//!
//! - **Declared type**: one of [`DeclaredType`]
//! - **Default**: optional schema default, used when the store has no row
//! - **Strictness**: coercive casting or strict validation, fixed for the option's lifetime
//! - **Priority**: ordering of this option's hook bindings (default `99`)
//! - **Scope**: site-scoped or network-scoped store
//! - **Constraints**: extra checks run by the input validator in strict mode
//!
//! Setters take `self` by value and return a new schema, so a clone taken
//! earlier never observes later changes.
//!
//! ```rust
//! use typed_options::{Constraint, OptionSchema, StoreScope};
//! use serde_json::json;
//!
//! let port = OptionSchema::integer("server_port")
//!     .with_default(json!(8080))
//!     .strict()
//!     .with_constraint(Constraint::min(1.0))
//!     .with_constraint(Constraint::max(65535.0));
//! assert!(port.validate_schema().is_ok());
//!
//! let flag = OptionSchema::boolean("maintenance_mode").with_scope(StoreScope::Network);
//! assert_eq!(flag.priority(), 99);
//! ```

use crate::caster::{DeclaredType, Strictness};
use crate::envelope;
use crate::error::{Error, Result};
use crate::validator::{Constraint, InputValidator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Priority used for hook bindings when none is given
pub const DEFAULT_PRIORITY: i32 = 99;

// =============================================================================
// Store Scope
// =============================================================================

/// Flavour of host store an option lives in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreScope {
    /// Per-site store; its default-read hook says whether the caller passed a default
    #[default]
    Site,
    /// Network-wide store; default reads cannot tell a caller default from the
    /// store's own placeholder, so pending-add tracking is needed
    Network,
}

// =============================================================================
// Option Schema
// =============================================================================

/// Declaration of a single typed option
#[derive(Debug, Clone)]
pub struct OptionSchema {
    name: String,
    declared: DeclaredType,
    default: Option<Value>,
    strictness: Strictness,
    priority: i32,
    scope: StoreScope,
    constraints: Vec<Constraint>,
}

impl OptionSchema {
    // =========================================================================
    // Type-specific constructors
    // =========================================================================

    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared,
            default: None,
            strictness: Strictness::Coercive,
            priority: DEFAULT_PRIORITY,
            scope: StoreScope::Site,
            constraints: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::String)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Boolean)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Number)
    }

    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Array)
    }

    // =========================================================================
    // Builder setters
    // =========================================================================

    /// Set the schema default
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Remove the schema default
    #[must_use]
    pub fn without_default(mut self) -> Self {
        self.default = None;
        self
    }

    /// Require exact types on read and validate writes
    #[must_use]
    pub fn strict(self) -> Self {
        self.with_strictness(Strictness::Strict)
    }

    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: StoreScope) -> Self {
        self.scope = scope;
        self
    }

    /// Append a constraint; constraints run in the order they were added
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> DeclaredType {
        self.declared
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn scope(&self) -> StoreScope {
        self.scope
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    // =========================================================================
    // Derived components
    // =========================================================================

    /// Input validator for this option's type and constraints
    pub fn validator(&self) -> InputValidator {
        InputValidator::new(self.declared, self.constraints.clone())
    }

    /// Schema default resolved through the output resolver, or `null`
    ///
    /// # Errors
    ///
    /// Returns a type mismatch if a strict option's default has the wrong type.
    pub fn resolved_default(&self) -> Result<Value> {
        match &self.default {
            Some(default) => envelope::resolve(default.clone(), self.declared, self.strictness),
            None => Ok(Value::Null),
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate the schema definition itself
    ///
    /// Checks:
    /// - Name is not blank
    /// - A strict option's default passes its own input validator
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate_schema(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("Option name cannot be blank".to_string()));
        }

        if self.strictness.is_strict() {
            if let Some(default) = &self.default {
                self.validator().validate(default).map_err(|e| {
                    Error::Config(format!("Default value for '{}' is invalid: {e}", self.name))
                })?;
            }
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
