// Basic usage example for typed-options
//
// Run with: cargo run --example basic_usage

use serde_json::json;
use typed_options::{Constraint, MemoryStore, OptionSchema, StoreScope, schemas_from_json};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // One network-scoped store; its registry binds options to the store's hooks
    let store = MemoryStore::network();
    let registry = store.registry();

    registry.register(
        OptionSchema::boolean("maintenance_mode")
            .with_default(json!(false))
            .with_scope(StoreScope::Network),
    )?;
    registry.register(
        OptionSchema::integer("server_port")
            .with_default(json!(8080))
            .strict()
            .with_scope(StoreScope::Network)
            .with_constraint(Constraint::min(1024.0))
            .with_constraint(Constraint::max(65535.0)),
    )?;

    // Declarative options work the same way
    for schema in schemas_from_json(
        r#"{ "allowed_origins": { "type": "array", "scope": "network", "default": [] } }"#,
    )? {
        registry.register(schema)?;
    }

    println!("📦 typed-options Basic Usage Example\n");
    println!("✅ Registered options: {:?}\n", registry.names());

    // Missing options read as their schema default
    println!("📖 Defaults:");
    for name in registry.names() {
        println!("  {name} = {}", store.get(&name, None)?);
    }

    // Stored falsy values stay falsy
    println!("\n🔧 Storing maintenance_mode = false...");
    store.add("maintenance_mode", json!(false))?;
    println!("  stored row: {}", store.raw("maintenance_mode").unwrap_or_default());
    println!("  read back:  {}", store.get("maintenance_mode", None)?);

    // Strict options reject wrong types and constraint violations
    println!("\n🚫 Writing invalid ports...");
    for value in [json!("9000"), json!(80)] {
        match store.update("server_port", value.clone()) {
            Ok(_) => println!("  {value} accepted"),
            Err(e) => println!("  {value} rejected: {e}"),
        }
    }
    store.update("server_port", json!(9000))?;
    println!("✅ server_port = {}", store.get("server_port", None)?);

    // Coercive array options wrap scalars
    println!("\n📋 Adding a single origin...");
    store.update("allowed_origins", json!("https://example.com"))?;
    println!("✅ allowed_origins = {}", store.get("allowed_origins", None)?);

    Ok(())
}
