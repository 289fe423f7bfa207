//! In-memory host option store

use crate::config::StoreScope;
use crate::error::Result;
use crate::hooks::{FilterArgs, Hook, HookBus};
use crate::registry::Registry;
use crate::resolution::NotOptionCache;
use crate::sync::RwLockExt;
use log::debug;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// The store's own "nothing here" default for reads without a caller default
pub const PLACEHOLDER: Value = Value::Bool(false);

// =============================================================================
// Not-Option Set
// =============================================================================

/// In-memory negative cache, keyed by scope id and option name
#[derive(Debug, Default)]
pub struct NotOptionSet {
    entries: RwLock<HashSet<(u64, String)>>,
}

impl NotOptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` has no row in `scope_id`
    pub fn mark(&self, scope_id: u64, name: &str) {
        self.entries.write_recovered().insert((scope_id, name.to_string()));
    }

    /// Forget the absence record for `name`
    pub fn unmark(&self, scope_id: u64, name: &str) {
        self.entries.write_recovered().remove(&(scope_id, name.to_string()));
    }
}

impl NotOptionCache for NotOptionSet {
    fn is_not_option(&self, scope_id: u64, name: &str) -> bool {
        self.entries
            .read_recovered()
            .contains(&(scope_id, name.to_string()))
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory option store that runs the host's hook protocol
///
/// Reads:
/// - cached as absent: default-read only
/// - row present: value-read
/// - row missing: mark absent, default-read, then (network scope only) value-read
///
/// Writes run validate then sanitize. `add` announces itself with
/// `add-started` and always ends with `add-completed`, even on failure.
///
/// # Example
///
/// ```
/// use typed_options::{MemoryStore, OptionSchema, StoreScope};
/// use serde_json::json;
///
/// let store = MemoryStore::new(StoreScope::Network, 1);
/// let registry = store.registry();
/// registry
///     .register(OptionSchema::boolean("beta").with_scope(StoreScope::Network))
///     .unwrap();
///
/// // Missing option reads as null, not the store's `false` placeholder
/// assert_eq!(store.get("beta", None).unwrap(), json!(null));
///
/// assert!(store.add("beta", json!(false)).unwrap());
/// assert_eq!(store.get("beta", None).unwrap(), json!(false));
/// assert_eq!(store.raw("beta"), Some(json!({ "__marker": false })));
/// ```
pub struct MemoryStore {
    scope: StoreScope,
    scope_id: u64,
    rows: RwLock<HashMap<String, Value>>,
    not_options: Arc<NotOptionSet>,
    hooks: Arc<HookBus>,
    registry: Registry<HookBus>,
}

impl MemoryStore {
    /// Create an empty store of the given scope flavour and id
    pub fn new(scope: StoreScope, scope_id: u64) -> Self {
        let not_options = Arc::new(NotOptionSet::new());
        let hooks = Arc::new(HookBus::new());
        let registry = Registry::new(
            Arc::clone(&hooks),
            Arc::clone(&not_options) as Arc<dyn NotOptionCache>,
        );
        Self {
            scope,
            scope_id,
            rows: RwLock::new(HashMap::new()),
            not_options,
            hooks,
            registry,
        }
    }

    /// Site-scoped store with id `1`
    pub fn site() -> Self {
        Self::new(StoreScope::Site, 1)
    }

    /// Network-scoped store with id `1`
    pub fn network() -> Self {
        Self::new(StoreScope::Network, 1)
    }

    pub fn scope(&self) -> StoreScope {
        self.scope
    }

    pub fn scope_id(&self) -> u64 {
        self.scope_id
    }

    pub fn hooks(&self) -> &Arc<HookBus> {
        &self.hooks
    }

    pub fn not_options(&self) -> &Arc<NotOptionSet> {
        &self.not_options
    }

    /// The registry bound to this store's hooks and not-option cache
    ///
    /// There is one registry per store, so an option name can only be
    /// registered once against the store's hooks.
    pub fn registry(&self) -> &Registry<HookBus> {
        &self.registry
    }

    fn args<'a>(&self, name: &'a str) -> FilterArgs<'a> {
        FilterArgs::new(name, self.scope_id)
    }

    /// Stored row as written, envelope included
    pub fn raw(&self, name: &str) -> Option<Value> {
        self.rows.read_recovered().get(name).cloned()
    }

    // =========================================================================
    // Option API
    // =========================================================================

    /// Read an option
    ///
    /// `default` is the caller's default; `None` means the store falls back to
    /// its [`PLACEHOLDER`].
    ///
    /// # Errors
    ///
    /// Propagates errors raised by read filters.
    pub fn get(&self, name: &str, default: Option<Value>) -> Result<Value> {
        let args = self.args(name).with_passed_default(default.is_some());
        let default = default.unwrap_or(PLACEHOLDER);

        if self.not_options.is_not_option(self.scope_id, name) {
            return self.hooks.apply_filters(Hook::ResolveDefault, default, &args);
        }

        let row = self.raw(name);
        match row {
            Some(value) => self.hooks.apply_filters(Hook::ResolveValue, value, &args),
            None => {
                self.not_options.mark(self.scope_id, name);
                let value = self.hooks.apply_filters(Hook::ResolveDefault, default, &args)?;
                match self.scope {
                    StoreScope::Site => Ok(value),
                    StoreScope::Network => {
                        self.hooks.apply_filters(Hook::ResolveValue, value, &args)
                    }
                }
            }
        }
    }

    /// Add an option that does not exist yet
    ///
    /// Returns `false` when the option already exists.
    ///
    /// # Errors
    ///
    /// Propagates validation errors and errors raised by read filters during
    /// the existence check.
    pub fn add(&self, name: &str, value: Value) -> Result<bool> {
        let args = self.args(name);
        self.hooks.do_action(Hook::AddStarted, &args);
        let result = self.insert_new(name, value, &args);
        self.hooks.do_action(Hook::AddCompleted, &args);
        result
    }

    fn insert_new(&self, name: &str, value: Value, args: &FilterArgs<'_>) -> Result<bool> {
        let value = self.hooks.apply_filters(Hook::ValidateOnAdd, value, args)?;
        let value = self.hooks.apply_filters(Hook::SanitizeOnWrite, value, args)?;

        if !self.not_options.is_not_option(self.scope_id, name) {
            let expected = match self.scope {
                StoreScope::Site => {
                    self.hooks
                        .apply_filters(Hook::ResolveDefault, PLACEHOLDER, args)?
                }
                StoreScope::Network => PLACEHOLDER,
            };
            if self.get(name, None)? != expected {
                debug!("Option '{name}' already exists, add skipped");
                return Ok(false);
            }
        }

        {
            let mut rows = self.rows.write_recovered();
            if rows.contains_key(name) {
                debug!("Option '{name}' already exists, add skipped");
                return Ok(false);
            }
            rows.insert(name.to_string(), value);
        }
        self.not_options.unmark(self.scope_id, name);
        debug!("Option '{name}' added");
        Ok(true)
    }

    /// Update an option, adding it if it does not exist
    ///
    /// Returns `false` when the stored row already equals the new value.
    ///
    /// # Errors
    ///
    /// Propagates validation errors.
    pub fn update(&self, name: &str, value: Value) -> Result<bool> {
        let args = self.args(name);
        let value = self.hooks.apply_filters(Hook::ValidateOnUpdate, value, &args)?;
        let value = self.hooks.apply_filters(Hook::SanitizeOnWrite, value, &args)?;

        let existing = self.raw(name);
        match existing {
            None => self.add(name, value),
            Some(old) if old == value => Ok(false),
            Some(_) => {
                self.rows.write_recovered().insert(name.to_string(), value);
                debug!("Option '{name}' updated");
                Ok(true)
            }
        }
    }

    /// Delete an option; returns whether a row was removed
    pub fn delete(&self, name: &str) -> bool {
        let removed = self.rows.write_recovered().remove(name).is_some();
        if removed {
            self.not_options.mark(self.scope_id, name);
            debug!("Option '{name}' deleted");
        }
        removed
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("scope", &self.scope)
            .field("scope_id", &self.scope_id)
            .field("rows", &self.rows.read_recovered().len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionSchema;
    use serde_json::json;

    #[test]
    fn test_untyped_store_behaves_like_plain_map() {
        let store = MemoryStore::site();

        assert_eq!(store.get("k", None).unwrap(), PLACEHOLDER);
        assert_eq!(store.get("k", Some(json!("d"))).unwrap(), json!("d"));

        assert!(store.add("k", json!(1)).unwrap());
        assert!(!store.add("k", json!(2)).unwrap());
        assert_eq!(store.get("k", None).unwrap(), json!(1));

        assert!(store.update("k", json!(3)).unwrap());
        assert!(!store.update("k", json!(3)).unwrap());
        assert_eq!(store.raw("k"), Some(json!(3)));

        assert!(store.delete("k"));
        assert!(!store.delete("k"));
        assert_eq!(store.get("k", None).unwrap(), PLACEHOLDER);
    }

    #[test]
    fn test_update_missing_adds() {
        let store = MemoryStore::network();
        assert!(store.update("k", json!("v")).unwrap());
        assert_eq!(store.raw("k"), Some(json!("v")));
    }

    #[test]
    fn test_not_option_tracking() {
        let store = MemoryStore::network();
        let cache = store.not_options();

        assert!(!cache.is_not_option(1, "k"));
        store.get("k", None).unwrap();
        assert!(cache.is_not_option(1, "k"));
        assert!(!cache.is_not_option(2, "k"));

        store.add("k", json!(1)).unwrap();
        assert!(!cache.is_not_option(1, "k"));

        store.delete("k");
        assert!(cache.is_not_option(1, "k"));
    }

    #[test]
    fn test_registry_is_shared_across_calls() {
        let store = MemoryStore::site();
        store
            .registry()
            .register(OptionSchema::integer("x"))
            .unwrap();

        let err = store
            .registry()
            .register(OptionSchema::string("x"))
            .unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(store.hooks().hook_count(Hook::SanitizeOnWrite, "x"), 1);

        store.add("x", json!("5")).unwrap();
        assert_eq!(store.get("x", None).unwrap(), json!(5));
    }
}
