//! Common test utilities for typed-options integration tests
//!
//! Provides store fixtures with a registry already bound to them.

#![allow(dead_code)]

use serde_json::{Value, json};
use typed_options::{
    Constraint, DeclaredType, HookBus, MemoryStore, OptionSchema, Registry, Strictness,
};

/// Install a test logger once; `RUST_LOG=debug` shows binding and resolution logs
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Test Fixture
// =============================================================================

/// A store with its registry bound to its hooks
pub struct TestFixture {
    pub store: MemoryStore,
}

impl TestFixture {
    /// Empty site-scoped store
    pub fn site() -> Self {
        Self::with_store(MemoryStore::site())
    }

    /// Empty network-scoped store
    pub fn network() -> Self {
        Self::with_store(MemoryStore::network())
    }

    fn with_store(store: MemoryStore) -> Self {
        init_logging();
        Self { store }
    }

    pub fn registry(&self) -> &Registry<HookBus> {
        self.store.registry()
    }

    /// Register one option, matching the store's scope
    pub fn register(&self, schema: OptionSchema) -> &Self {
        self.registry()
            .register(schema.with_scope(self.store.scope()))
            .expect("Failed to register option");
        self
    }

    /// Register the standard option set
    pub fn with_standard_options(self) -> Self {
        for schema in standard_options() {
            self.register(schema);
        }
        self
    }

    /// Read without a caller default
    pub fn read(&self, name: &str) -> Value {
        self.store.get(name, None).expect("Read failed")
    }
}

// =============================================================================
// Standard Options
// =============================================================================

/// One option per declared type and strictness
pub fn standard_options() -> Vec<OptionSchema> {
    vec![
        OptionSchema::string("site_title").with_default(json!("My Site")),
        OptionSchema::boolean("comments_open").with_default(json!(true)),
        OptionSchema::integer("posts_per_page").with_default(json!(10)),
        OptionSchema::number("ratio"),
        OptionSchema::array("tags").with_default(json!([])),
        OptionSchema::string("admin_email")
            .strict()
            .with_constraint(Constraint::pattern(r"^[^@\s]+@[^@\s]+$").expect("valid pattern")),
        OptionSchema::boolean("maintenance").strict(),
        OptionSchema::integer("port")
            .with_default(json!(8080))
            .strict()
            .with_constraint(Constraint::min(1.0))
            .with_constraint(Constraint::max(65535.0)),
    ]
}

/// Sample values covering every runtime kind
pub fn sample_values() -> Vec<Value> {
    vec![
        json!(null),
        json!(true),
        json!(false),
        json!(0),
        json!(42),
        json!(-7),
        json!(1.5),
        json!(0.0),
        json!(""),
        json!("0"),
        json!("hello"),
        json!(" 12 "),
        json!("3.9"),
        json!([]),
        json!([1, "a"]),
        json!({ "k": "v" }),
    ]
}

/// Every declared type paired with every strictness
pub fn all_modes() -> Vec<(DeclaredType, Strictness)> {
    DeclaredType::ALL
        .iter()
        .flat_map(|declared| {
            [Strictness::Coercive, Strictness::Strict]
                .into_iter()
                .map(move |strictness| (*declared, strictness))
        })
        .collect()
}

