//! Host hook bus
//!
//! The engine never calls the store itself; it hangs callbacks on the host's
//! read/write hooks. [`HookHost`] is that seam, and [`HookBus`] is an
//! in-memory implementation: one chain per (hook, option), run in ascending
//! priority order, equal priorities in registration order.

use crate::error::Result;
use crate::sync::RwLockExt;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

// =============================================================================
// Hook Points
// =============================================================================

/// Hook points the engine binds per option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Filter: validate a value about to be added
    ValidateOnAdd,
    /// Filter: validate a value about to replace a stored one
    ValidateOnUpdate,
    /// Filter: transform a value about to be written
    SanitizeOnWrite,
    /// Filter: value returned for a missing row
    ResolveDefault,
    /// Filter: value returned for a read
    ResolveValue,
    /// Action: an add operation is starting
    AddStarted,
    /// Action: an add operation has finished, successfully or not
    AddCompleted,
}

impl Hook {
    pub const ALL: [Hook; 7] = [
        Hook::ValidateOnAdd,
        Hook::ValidateOnUpdate,
        Hook::SanitizeOnWrite,
        Hook::ResolveDefault,
        Hook::ResolveValue,
        Hook::AddStarted,
        Hook::AddCompleted,
    ];

    /// Conventional event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::ValidateOnAdd => "validate-on-add",
            Hook::ValidateOnUpdate => "validate-on-update",
            Hook::SanitizeOnWrite => "sanitize-on-write",
            Hook::ResolveDefault => "resolve-default",
            Hook::ResolveValue => "resolve-value",
            Hook::AddStarted => "add-started",
            Hook::AddCompleted => "add-completed",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments passed along with every hook invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterArgs<'a> {
    /// Option name
    pub option: &'a str,
    /// Store scope (site or network id)
    pub scope_id: u64,
    /// Whether the reader passed an explicit default (default reads only)
    pub passed_default: bool,
}

impl<'a> FilterArgs<'a> {
    pub fn new(option: &'a str, scope_id: u64) -> Self {
        Self {
            option,
            scope_id,
            passed_default: false,
        }
    }

    #[must_use]
    pub fn with_passed_default(mut self, passed: bool) -> Self {
        self.passed_default = passed;
        self
    }
}

/// Filter callback: receives the value and returns the (possibly replaced) value
pub type FilterCallback = Arc<dyn Fn(Value, &FilterArgs<'_>) -> Result<Value> + Send + Sync>;

/// Action callback: notified, returns nothing
pub type ActionCallback = Arc<dyn Fn(&FilterArgs<'_>) + Send + Sync>;

/// Box a closure as a [`FilterCallback`]
pub fn filter<F>(callback: F) -> FilterCallback
where
    F: Fn(Value, &FilterArgs<'_>) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(callback)
}

/// Box a closure as an [`ActionCallback`]
pub fn action<F>(callback: F) -> ActionCallback
where
    F: Fn(&FilterArgs<'_>) + Send + Sync + 'static,
{
    Arc::new(callback)
}

/// The host's hook registration API
pub trait HookHost: Send + Sync {
    /// Register a filter for `option` on `hook`
    fn add_filter(&self, hook: Hook, option: &str, priority: i32, callback: FilterCallback);

    /// Register an action for `option` on `hook`
    fn add_action(&self, hook: Hook, option: &str, priority: i32, callback: ActionCallback);
}

// =============================================================================
// Hook Bus
// =============================================================================

struct Entry<C> {
    priority: i32,
    callback: C,
}

type Chains<C> = RwLock<HashMap<(Hook, String), Vec<Entry<C>>>>;

/// In-memory priority-ordered hook bus
pub struct HookBus {
    filters: Chains<FilterCallback>,
    actions: Chains<ActionCallback>,
}

/// Insert keeping ascending priority; equal priorities stay in arrival order
fn insert_ordered<C>(chain: &mut Vec<Entry<C>>, entry: Entry<C>) {
    let at = chain.partition_point(|e| e.priority <= entry.priority);
    chain.insert(at, entry);
}

impl HookBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: RwLock::new(HashMap::new()),
            actions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a filter from a plain closure
    pub fn on_filter<F>(&self, hook: Hook, option: &str, priority: i32, callback: F)
    where
        F: Fn(Value, &FilterArgs<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.add_filter(hook, option, priority, filter(callback));
    }

    /// Register an action from a plain closure
    pub fn on_action<F>(&self, hook: Hook, option: &str, priority: i32, callback: F)
    where
        F: Fn(&FilterArgs<'_>) + Send + Sync + 'static,
    {
        self.add_action(hook, option, priority, action(callback));
    }

    /// Run the filter chain for `args.option` on `hook`
    ///
    /// The chain is snapshotted before running, so callbacks may use the bus
    /// (directly or through the store) without deadlocking.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a filter; later filters do not run.
    pub fn apply_filters(&self, hook: Hook, value: Value, args: &FilterArgs<'_>) -> Result<Value> {
        let chain: Vec<FilterCallback> = {
            let guard = self.filters.read_recovered();
            match guard.get(&(hook, args.option.to_string())) {
                Some(entries) => entries.iter().map(|e| Arc::clone(&e.callback)).collect(),
                None => return Ok(value),
            }
        };

        chain
            .iter()
            .try_fold(value, |value, callback| callback(value, args))
    }

    /// Notify every action registered for `args.option` on `hook`
    pub fn do_action(&self, hook: Hook, args: &FilterArgs<'_>) {
        let chain: Vec<ActionCallback> = {
            let guard = self.actions.read_recovered();
            match guard.get(&(hook, args.option.to_string())) {
                Some(entries) => entries.iter().map(|e| Arc::clone(&e.callback)).collect(),
                None => return,
            }
        };

        for callback in &chain {
            callback(args);
        }
    }

    /// Number of callbacks (filters and actions) bound to `option` on `hook`
    pub fn hook_count(&self, hook: Hook, option: &str) -> usize {
        let key = (hook, option.to_string());
        let filters = self.filters.read_recovered().get(&key).map_or(0, Vec::len);
        let actions = self.actions.read_recovered().get(&key).map_or(0, Vec::len);
        filters + actions
    }

    pub fn has_hook(&self, hook: Hook, option: &str) -> bool {
        self.hook_count(hook, option) > 0
    }

    /// Remove every callback bound to `option`
    pub fn remove_option(&self, option: &str) {
        self.filters.write_recovered().retain(|(_, name), _| name != option);
        self.actions.write_recovered().retain(|(_, name), _| name != option);
    }

    /// Remove all callbacks
    pub fn clear(&self) {
        self.filters.write_recovered().clear();
        self.actions.write_recovered().clear();
    }
}

impl HookHost for HookBus {
    fn add_filter(&self, hook: Hook, option: &str, priority: i32, callback: FilterCallback) {
        let mut filters = self.filters.write_recovered();
        let chain = filters.entry((hook, option.to_string())).or_default();
        insert_ordered(chain, Entry { priority, callback });
    }

    fn add_action(&self, hook: Hook, option: &str, priority: i32, callback: ActionCallback) {
        let mut actions = self.actions.write_recovered();
        let chain = actions.entry((hook, option.to_string())).or_default();
        insert_ordered(chain, Entry { priority, callback });
    }
}

impl Default for HookBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HookBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBus")
            .field("filter_chains", &self.filters.read_recovered().len())
            .field("action_chains", &self.actions.read_recovered().len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
