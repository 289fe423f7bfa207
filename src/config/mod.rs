//! Option schema types
//!
//! This module contains the declaration side of the engine:
//! - `OptionSchema` - Immutable per-option declaration (type, default, strictness, constraints)
//! - `StoreScope` - Which flavour of host store the option lives in
//! - `OptionDefinition` - Serde form of a schema, for declarative configuration

mod definition;
mod schema;

pub use definition::{OptionDefinition, schemas_from_json};
pub use schema::{DEFAULT_PRIORITY, OptionSchema, StoreScope};
