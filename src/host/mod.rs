//! Host store implementations
//!
//! The engine only needs the host's hooks and its not-option cache. The
//! in-memory store here drives those hooks the way a real host option API
//! does; it backs the crate's tests and examples and never persists anything.

mod memory;

pub use memory::{MemoryStore, NotOptionSet, PLACEHOLDER};
