//! Validation Integration Tests
//!
//! Strict options through the host store:
//! - Type checks on add and update
//! - Constraint ordering and fail-fast
//! - Declarative schemas loaded from JSON

mod common;

use common::TestFixture;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use typed_options::{Constraint, Error, OptionSchema, schemas_from_json};

// =============================================================================
// Type Checks
// =============================================================================

#[test]
fn test_strict_add_and_update_reject_wrong_types() {
    let fixture = TestFixture::site().with_standard_options();

    let err = fixture.store.add("port", json!("8080")).unwrap_err();
    assert!(matches!(
        err,
        Error::TypeMismatch { ref actual, .. } if actual == "string"
    ));
    assert_eq!(fixture.store.raw("port"), None);

    assert!(fixture.store.add("port", json!(3000)).unwrap());
    let err = fixture.store.update("port", json!(3000.5)).unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(fixture.read("port"), json!(3000));
}

#[test]
fn test_strict_null_is_accepted() {
    let fixture = TestFixture::network().with_standard_options();

    assert!(fixture.store.add("maintenance", json!(null)).unwrap());
    assert_eq!(fixture.store.raw("maintenance"), Some(json!({ "__marker": null })));
    assert_eq!(fixture.read("maintenance"), json!(null));
}

#[test]
fn test_coercive_options_accept_anything() {
    let fixture = TestFixture::site().with_standard_options();

    assert!(fixture.store.add("posts_per_page", json!("lots")).unwrap());
    assert_eq!(fixture.read("posts_per_page"), json!(null));
}

// =============================================================================
// Constraints
// =============================================================================

#[test]
fn test_builtin_constraints_through_store() {
    let fixture = TestFixture::site().with_standard_options();

    let err = fixture.store.add("port", json!(0)).unwrap_err();
    assert!(err.is_constraint_error());
    assert_eq!(err.to_string(), "Value must be at least 1");

    let err = fixture.store.add("admin_email", json!("nobody")).unwrap_err();
    assert!(err.is_constraint_error());

    assert!(fixture.store.add("admin_email", json!("admin@example.com")).unwrap());
}

#[test]
fn test_constraint_fail_fast() {
    let fixture = TestFixture::network();
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);

    fixture.register(
        OptionSchema::integer("limit")
            .strict()
            .with_constraint(Constraint::predicate(|v| v.as_i64() != Some(13), "Unlucky"))
            .with_constraint(Constraint::check(move |_| {
                counter_clone.fetch_add(1, Ordering::SeqCst);
                true
            })),
    );

    let err = fixture.store.add("limit", json!(13)).unwrap_err();
    assert_eq!(err.to_string(), "Unlucky");
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert!(fixture.registry().pending().is_empty());

    assert!(fixture.store.add("limit", json!(12)).unwrap());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_structured_validator_message() {
    let fixture = TestFixture::site();
    fixture.register(OptionSchema::array("tags").strict().with_constraint(
        Constraint::validator(|v| {
            v.as_array()
                .into_iter()
                .flatten()
                .filter(|item| !item.is_string())
                .map(|item| format!("Tag {item} is not a string"))
                .collect()
        }),
    ));

    let err = fixture.store.update("tags", json!(["a", 1, true])).unwrap_err();
    assert_eq!(err.to_string(), "Tag 1 is not a string");
    assert!(fixture.store.update("tags", json!(["a", "b"])).unwrap());
}

// =============================================================================
// Declarative Schemas
// =============================================================================

#[test]
fn test_register_from_json() {
    let fixture = TestFixture::network();
    let schemas = schemas_from_json(
        r#"{
            "theme": { "type": "string", "strict": true, "default": "light", "options": ["light", "dark"] },
            "retries": { "type": "int", "default": 3, "min": 0, "max": 10, "strict": true },
            "beta": { "type": "bool", "scope": "network" }
        }"#,
    )
    .unwrap();

    for schema in schemas {
        fixture.register(schema);
    }
    assert_eq!(fixture.registry().names(), vec!["beta", "retries", "theme"]);

    assert_eq!(fixture.read("theme"), json!("light"));
    assert_eq!(fixture.read("retries"), json!(3));
    assert_eq!(fixture.read("beta"), json!(null));

    let err = fixture.store.add("theme", json!("blue")).unwrap_err();
    assert!(err.is_constraint_error());
    let err = fixture.store.add("retries", json!(11)).unwrap_err();
    assert!(err.is_constraint_error());
    assert!(fixture.store.add("theme", json!("dark")).unwrap());
    assert_eq!(fixture.read("theme"), json!("dark"));
}

#[test]
fn test_invalid_declarations() {
    let fixture = TestFixture::site();

    let err = schemas_from_json(r#"{ "x": { "default": 1 } }"#).unwrap_err();
    assert!(err.is_config_error());

    let err = schemas_from_json(r#"{ "x": { "type": "integer", "strict": true, "default": "1" } }"#)
        .unwrap_err();
    assert!(err.is_config_error());

    let err = schemas_from_json("not json").unwrap_err();
    assert!(matches!(err, Error::Serialize(_)));

    fixture.register(OptionSchema::string("taken"));
    let err = fixture.registry().register(OptionSchema::integer("taken")).unwrap_err();
    assert!(err.is_config_error());
}
