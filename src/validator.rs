//! Strict-mode input validation
//!
//! Checks a value on its way into the store: exact runtime type first, then
//! each registered [`Constraint`] in declaration order. The first failure
//! aborts; later constraints are not evaluated.

use crate::caster::DeclaredType;
use crate::envelope;
use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Boolean predicate over a value
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Structured validator returning zero or more violation messages
pub type ValidatorFn = Arc<dyn Fn(&Value) -> Vec<String> + Send + Sync>;

const DEFAULT_PREDICATE_MESSAGE: &str = "Value failed validation";

// =============================================================================
// Constraints
// =============================================================================

/// A single check applied to values of a strict option
///
/// Built-in numeric, text and array checks pass for values of other kinds;
/// the type check already ran before constraints are consulted.
#[derive(Clone)]
pub enum Constraint {
    /// Predicate with a verbatim failure message
    Predicate { check: PredicateFn, message: String },
    /// Structured validator; the first violation is reported
    Validator(ValidatorFn),
    /// Numeric lower bound (inclusive)
    Min(f64),
    /// Numeric upper bound (inclusive)
    Max(f64),
    /// Regex the whole string value must match
    Pattern(Regex),
    /// Value must equal one of these
    OneOf(Vec<Value>),
    /// Array must have at most this many elements
    MaxItems(usize),
}

impl Constraint {
    /// Predicate constraint failing with `message`
    pub fn predicate<F>(check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Constraint::Predicate {
            check: Arc::new(check),
            message: message.into(),
        }
    }

    /// Predicate constraint with the default failure message
    pub fn check<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::predicate(check, DEFAULT_PREDICATE_MESSAGE)
    }

    /// Structured validator constraint
    pub fn validator<F>(validate: F) -> Self
    where
        F: Fn(&Value) -> Vec<String> + Send + Sync + 'static,
    {
        Constraint::Validator(Arc::new(validate))
    }

    pub fn min(val: f64) -> Self {
        Constraint::Min(val)
    }

    pub fn max(val: f64) -> Self {
        Constraint::Max(val)
    }

    /// Regex constraint
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty or invalid pattern.
    pub fn pattern(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::Config("Pattern cannot be empty string".into()));
        }
        Regex::new(pattern)
            .map(Constraint::Pattern)
            .map_err(|e| Error::Config(format!("Invalid regex pattern: {e}")))
    }

    pub fn one_of(options: Vec<Value>) -> Self {
        Constraint::OneOf(options)
    }

    pub fn max_items(limit: usize) -> Self {
        Constraint::MaxItems(limit)
    }

    /// Run this constraint against a value
    ///
    /// # Errors
    ///
    /// Returns the failure message.
    pub fn check_value(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            Constraint::Predicate { check, message } => {
                if !check(value) {
                    return Err(message.clone());
                }
            }
            Constraint::Validator(validate) => {
                if let Some(first) = validate(value).into_iter().next() {
                    return Err(first);
                }
            }
            Constraint::Min(min) => {
                if let Some(num) = value.as_f64() {
                    if num < *min {
                        return Err(format!("Value must be at least {min}"));
                    }
                }
            }
            Constraint::Max(max) => {
                if let Some(num) = value.as_f64() {
                    if num > *max {
                        return Err(format!("Value must be at most {max}"));
                    }
                }
            }
            Constraint::Pattern(re) => {
                if let Some(text) = value.as_str() {
                    if !re.is_match(text) {
                        return Err(format!("Value does not match pattern: {}", re.as_str()));
                    }
                }
            }
            Constraint::OneOf(options) => {
                if !options.contains(value) {
                    return Err("Value must be one of the available options".to_string());
                }
            }
            Constraint::MaxItems(limit) => {
                let len = match value {
                    Value::Array(items) => items.len(),
                    Value::Object(map) => map.len(),
                    _ => 0,
                };
                if len > *limit {
                    return Err(format!("Value must have at most {limit} items"));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Predicate { message, .. } => {
                f.debug_struct("Predicate").field("message", message).finish()
            }
            Constraint::Validator(_) => f.write_str("Validator"),
            Constraint::Min(v) => f.debug_tuple("Min").field(v).finish(),
            Constraint::Max(v) => f.debug_tuple("Max").field(v).finish(),
            Constraint::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Constraint::OneOf(options) => f.debug_tuple("OneOf").field(options).finish(),
            Constraint::MaxItems(n) => f.debug_tuple("MaxItems").field(n).finish(),
        }
    }
}

// =============================================================================
// Input Validator
// =============================================================================

/// Type and constraint gate for a strict option
#[derive(Debug, Clone)]
pub struct InputValidator {
    declared: DeclaredType,
    constraints: Vec<Constraint>,
}

impl InputValidator {
    #[must_use]
    pub fn new(declared: DeclaredType, constraints: Vec<Constraint>) -> Self {
        Self {
            declared,
            constraints,
        }
    }

    pub fn declared_type(&self) -> DeclaredType {
        self.declared
    }

    /// Validate a value before it is written
    ///
    /// Enveloped values are validated on their logical value. `null` always
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the runtime type differs from the
    /// declared type, or [`Error::Constraint`] carrying the first failing
    /// constraint's message.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let value = envelope::logical(value);
        if value.is_null() {
            return Ok(());
        }
        if !self.declared.matches(value) {
            return Err(Error::type_mismatch(self.declared, value));
        }
        for constraint in &self.constraints {
            constraint
                .check_value(value)
                .map_err(|message| Error::Constraint { message })?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_type_check() {
        let validator = InputValidator::new(DeclaredType::Integer, vec![]);

        match validator.validate(&json!("123")) {
            Err(Error::TypeMismatch { expected, actual }) => {
                assert_eq!(expected, DeclaredType::Integer);
                assert_eq!(actual, "string");
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
        assert!(validator.validate(&json!(123)).is_ok());
        assert!(validator.validate(&json!(1.5)).is_err());
    }

    #[test]
    fn test_string_type_is_checked() {
        let validator = InputValidator::new(DeclaredType::String, vec![]);
        assert!(validator.validate(&json!("ok")).is_ok());
        assert!(validator.validate(&json!(5)).is_err());
    }

    #[test]
    fn test_null_short_circuits() {
        let validator = InputValidator::new(
            DeclaredType::Boolean,
            vec![Constraint::check(|_| false)],
        );
        assert!(validator.validate(&Value::Null).is_ok());
        assert!(validator.validate(&envelope::sanitize(Value::Null)).is_ok());
    }

    #[test]
    fn test_envelope_is_unwrapped() {
        let validator = InputValidator::new(DeclaredType::Boolean, vec![]);
        assert!(validator.validate(&envelope::sanitize(json!(false))).is_ok());
        assert!(validator.validate(&envelope::sanitize(json!("no"))).is_err());
    }

    #[test]
    fn test_predicate_message_is_verbatim() {
        let validator = InputValidator::new(
            DeclaredType::Integer,
            vec![Constraint::predicate(
                |v| v.as_i64().is_some_and(|n| n > 0 && n <= 65535),
                "Port must be between 1 and 65535",
            )],
        );
        assert!(validator.validate(&json!(8080)).is_ok());
        let err = validator.validate(&json!(70000)).unwrap_err();
        assert!(err.is_constraint_error());
        assert_eq!(err.to_string(), "Port must be between 1 and 65535");
    }

    #[test]
    fn test_structured_validator_reports_first_violation() {
        let validator = InputValidator::new(
            DeclaredType::String,
            vec![Constraint::validator(|v| {
                let text = v.as_str().unwrap_or_default();
                let mut violations = Vec::new();
                if text.len() < 3 {
                    violations.push("too short".to_string());
                }
                if !text.starts_with('x') {
                    violations.push("must start with x".to_string());
                }
                violations
            })],
        );
        assert!(validator.validate(&json!("xyz")).is_ok());
        assert_eq!(
            validator.validate(&json!("ab")).unwrap_err().to_string(),
            "too short"
        );
    }

    #[test]
    fn test_fail_fast() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let validator = InputValidator::new(
            DeclaredType::Integer,
            vec![
                Constraint::predicate(|_| false, "first"),
                Constraint::check(move |_| {
                    counter_clone.fetch_add(1, Ordering::SeqCst);
                    true
                }),
            ],
        );

        let err = validator.validate(&json!(1)).unwrap_err();
        assert_eq!(err.to_string(), "first");
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_builtin_constraints() {
        let range = InputValidator::new(
            DeclaredType::Number,
            vec![Constraint::min(1.0), Constraint::max(10.0)],
        );
        assert!(range.validate(&json!(1)).is_ok());
        assert!(range.validate(&json!(10.0)).is_ok());
        assert_eq!(
            range.validate(&json!(0.5)).unwrap_err().to_string(),
            "Value must be at least 1"
        );
        assert_eq!(
            range.validate(&json!(11)).unwrap_err().to_string(),
            "Value must be at most 10"
        );

        let email = InputValidator::new(
            DeclaredType::String,
            vec![Constraint::pattern(r"^[\w.-]+@[\w.-]+\.\w+$").unwrap()],
        );
        assert!(email.validate(&json!("user@example.com")).is_ok());
        assert_eq!(
            email.validate(&json!("not-an-email")).unwrap_err().to_string(),
            r"Value does not match pattern: ^[\w.-]+@[\w.-]+\.\w+$"
        );

        let theme = InputValidator::new(
            DeclaredType::String,
            vec![Constraint::one_of(vec![json!("light"), json!("dark")])],
        );
        assert!(theme.validate(&json!("dark")).is_ok());
        assert!(theme.validate(&json!("blue")).is_err());

        let tags = InputValidator::new(DeclaredType::Array, vec![Constraint::max_items(2)]);
        assert!(tags.validate(&json!(["a", "b"])).is_ok());
        assert!(tags.validate(&json!(["a", "b", "c"])).is_err());
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        assert!(Constraint::pattern("(").unwrap_err().is_config_error());
        assert!(Constraint::pattern("").unwrap_err().is_config_error());
    }
}
