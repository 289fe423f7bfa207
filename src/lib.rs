//! # typed-options - typed values for untyped option stores
//!
//! A host key/value option store keeps whatever it is given and returns
//! `false` for anything it does not have. This crate layers declared types on
//! top of such a store without touching the store itself: it hangs callbacks
//! on the host's read and write hooks.
//!
//! ## Features
//!
//! - **Type casting**: stored values are cast to the declared type on read,
//!   coercively (never fails) or strictly (type mismatch is an error)
//! - **Falsy-safe storage**: values are wrapped in an envelope on write so a
//!   stored `false`, `0` or `""` is never mistaken for a missing option
//! - **Input validation**: strict options reject wrongly typed writes and run
//!   custom constraints
//! - **Default resolution**: missing options read as their schema default (or
//!   `null`) instead of the store's `false` placeholder
//! - **Declarative schemas**: options can be defined in JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use typed_options::{MemoryStore, OptionSchema, StoreScope};
//! use serde_json::json;
//!
//! # fn example() -> typed_options::Result<()> {
//! let store = MemoryStore::site();
//! let registry = store.registry();
//!
//! registry.register(OptionSchema::integer("posts_per_page").with_default(json!(10)))?;
//! registry.register(OptionSchema::boolean("comments_open").strict())?;
//!
//! // Missing options read as their schema default
//! assert_eq!(store.get("posts_per_page", None)?, json!(10));
//!
//! // Coercive options cast on read
//! store.add("posts_per_page", json!("25"))?;
//! assert_eq!(store.get("posts_per_page", None)?, json!(25));
//!
//! // Strict options reject wrongly typed writes
//! assert!(store.add("comments_open", json!("yes")).unwrap_err().is_type_error());
//!
//! // A stored `false` stays `false`
//! store.add("comments_open", json!(false))?;
//! assert_eq!(store.get("comments_open", None)?, json!(false));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Strictness
//!
//! | Mode | Read of a mismatched value | Write of a mismatched value |
//! |---|---|---|
//! | `Coercive` | cast, or `null` when no sensible cast exists | stored as given |
//! | `Strict` | `TypeMismatch` error | `TypeMismatch` error |
//!
//! `null` passes through every caster in both modes.
//!
//! ## Custom Hosts
//!
//! [`MemoryStore`] is an in-memory reference host. A real host implements
//! [`HookHost`] over its own hook system and [`NotOptionCache`] over its
//! negative cache, then builds a [`Registry`] from them.

// Core modules
mod error;
pub mod value;

// Type pipeline
pub mod caster;
pub mod envelope;
pub mod validator;

// Schema and binding
pub mod config;
pub mod hooks;
pub mod registry;
pub mod resolution;

pub mod host;

#[cfg(feature = "introspection")]
pub mod introspection;

mod sync;

// Re-exports
pub use caster::{DeclaredType, Strictness};
pub use config::{OptionDefinition, OptionSchema, StoreScope, schemas_from_json};
pub use error::{Error, Result};
pub use hooks::{FilterArgs, Hook, HookBus, HookHost};
pub use host::{MemoryStore, NotOptionSet};
pub use registry::Registry;
pub use resolution::{DefaultResolver, NotOptionCache, PendingState, PendingStatus};
pub use validator::{Constraint, InputValidator};

#[cfg(feature = "introspection")]
pub use introspection::rest_schema;
