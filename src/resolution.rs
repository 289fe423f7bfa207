//! Default-value resolution
//!
//! The host store answers a read for a missing option with a placeholder
//! (`false` unless the caller passed its own default), and a network-scoped
//! store cannot say which of the two it is returning. [`DefaultResolver`]
//! decides what the reader should actually see:
//!
//! - the schema default (or `null`) when the placeholder stands for "no row"
//! - the caller's own default, cast to the declared type, when one was passed
//! - the raw placeholder while the option is being added, so the host's
//!   "does it already exist?" check still sees `false`
//!
//! The last case needs per-option state ([`PendingState`]) that lives only for
//! the duration of one add. The host runs `add -> default read -> add completed`
//! without re-entering the same option, so the state needs no further
//! synchronisation than the map lock. Hosts sharing one [`PendingState`] across
//! truly concurrent requests must give each request its own instance.

use crate::caster::DeclaredType;
use crate::config::OptionSchema;
use crate::envelope;
use crate::error::Result;
use crate::sync::RwLockExt;
use log::{debug, trace};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

// =============================================================================
// Pending State
// =============================================================================

/// Per-option add state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStatus {
    Idle,
    Adding,
}

/// Name-keyed transient map of options currently being added
///
/// Entries exist only between [`begin`](Self::begin) and
/// [`finish`](Self::finish); nothing is persisted.
#[derive(Debug, Default)]
pub struct PendingState {
    adding: RwLock<HashSet<String>>,
}

impl PendingState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as being added
    pub fn begin(&self, name: &str) {
        debug!("Option '{name}' entering add");
        self.adding.write_recovered().insert(name.to_string());
    }

    /// Clear the add state for `name`
    ///
    /// Unconditional and idempotent: called whether the add succeeded or not.
    pub fn finish(&self, name: &str) {
        if self.adding.write_recovered().remove(name) {
            debug!("Option '{name}' add finished");
        }
    }

    pub fn status(&self, name: &str) -> PendingStatus {
        if self.adding.read_recovered().contains(name) {
            PendingStatus::Adding
        } else {
            PendingStatus::Idle
        }
    }

    pub fn is_adding(&self, name: &str) -> bool {
        self.status(name) == PendingStatus::Adding
    }

    /// Number of options currently being added
    pub fn len(&self) -> usize {
        self.adding.read_recovered().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Not-Option Cache
// =============================================================================

/// The host's negative cache of options known to have no stored row
///
/// Read-only from the engine's side; the host store maintains it.
pub trait NotOptionCache: Send + Sync {
    /// Whether `name` is known to be absent in store scope `scope_id`
    fn is_not_option(&self, scope_id: u64, name: &str) -> bool;
}

// =============================================================================
// Default Resolver
// =============================================================================

/// Whether the value is the store's own "nothing here" placeholder
fn is_placeholder(value: &Value) -> bool {
    matches!(value, Value::Bool(false))
}

/// Resolves default and stored values for one option
pub struct DefaultResolver {
    schema: Arc<OptionSchema>,
    pending: Arc<PendingState>,
    not_options: Arc<dyn NotOptionCache>,
}

impl DefaultResolver {
    pub fn new(
        schema: Arc<OptionSchema>,
        pending: Arc<PendingState>,
        not_options: Arc<dyn NotOptionCache>,
    ) -> Self {
        Self {
            schema,
            pending,
            not_options,
        }
    }

    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    fn resolve(&self, value: Value) -> Result<Value> {
        envelope::resolve(value, self.schema.declared_type(), self.schema.strictness())
    }

    // =========================================================================
    // Network-scoped store
    // =========================================================================

    /// Default-read path of a network-scoped store
    ///
    /// `raw_default` is whatever the store is about to return for a missing
    /// row: its `false` placeholder or the caller's default argument.
    ///
    /// Boolean options cannot tell a caller default of `true` apart from a
    /// stored-looking `true`; it is returned as-is. A caller default of `false`
    /// is indistinguishable from the placeholder and yields the schema default.
    ///
    /// # Errors
    ///
    /// Propagates type mismatches from strict casting.
    pub fn resolve_default(&self, raw_default: Value, scope_id: u64) -> Result<Value> {
        let name = self.schema.name();

        if self.pending.is_adding(name) {
            trace!("Option '{name}' is being added, keeping raw default");
            return Ok(raw_default);
        }

        if !self.not_options.is_not_option(scope_id, name) {
            return Ok(raw_default);
        }

        let caller_supplied = match self.schema.declared_type() {
            DeclaredType::Boolean => {
                if raw_default == Value::Bool(true) {
                    return Ok(raw_default);
                }
                !raw_default.is_boolean()
            }
            _ => !is_placeholder(&raw_default),
        };

        if caller_supplied {
            trace!("Option '{name}' missing, resolving caller default");
            self.resolve(raw_default)
        } else {
            trace!("Option '{name}' missing, using schema default");
            self.schema.resolved_default()
        }
    }

    /// Value-read path of a network-scoped store
    ///
    /// A value for an option the cache marks absent already went through
    /// [`resolve_default`](Self::resolve_default) and is returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates type mismatches from strict casting.
    pub fn resolve_value(&self, raw: Value, scope_id: u64) -> Result<Value> {
        if self.not_options.is_not_option(scope_id, self.schema.name()) {
            return Ok(raw);
        }
        self.resolve(raw)
    }

    // =========================================================================
    // Site-scoped store
    // =========================================================================

    /// Default-read path of a site-scoped store, which reports whether the
    /// caller passed a default
    ///
    /// # Errors
    ///
    /// Propagates type mismatches from strict casting.
    pub fn resolve_site_default(&self, raw_default: Value, passed_default: bool) -> Result<Value> {
        if passed_default {
            self.resolve(raw_default)
        } else {
            self.schema.resolved_default()
        }
    }

    /// Value-read path of a site-scoped store
    ///
    /// # Errors
    ///
    /// Propagates type mismatches from strict casting.
    pub fn resolve_site_value(&self, raw: Value) -> Result<Value> {
        self.resolve(raw)
    }
}

impl std::fmt::Debug for DefaultResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultResolver")
            .field("option", &self.schema.name())
            .field("pending", &self.pending.status(self.schema.name()))
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
