//! Option registry
//!
//! Validates option schemas and binds the engine's components to the host's
//! hook points. Per registered option:
//!
//! | Hook | Bound when | Component |
//! |---|---|---|
//! | `sanitize-on-write` | always | envelope sanitizer |
//! | `validate-on-add`, `validate-on-update` | strict options | input validator |
//! | `resolve-default`, `resolve-value` | always | default resolver for the option's scope |
//! | `add-started`, `add-completed` | network-scoped options | pending-add tracking |
//!
//! Every binding uses the schema's priority.

use crate::config::{OptionSchema, StoreScope};
use crate::envelope;
use crate::error::{Error, Result};
use crate::hooks::{Hook, HookHost, action, filter};
use crate::resolution::{DefaultResolver, NotOptionCache, PendingState};
use crate::sync::RwLockExt;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of typed options bound to a host's hooks
pub struct Registry<H: HookHost> {
    hooks: Arc<H>,
    not_options: Arc<dyn NotOptionCache>,
    pending: Arc<PendingState>,
    schemas: RwLock<HashMap<String, Arc<OptionSchema>>>,
}

impl<H: HookHost> Registry<H> {
    /// Create a registry bound to `hooks`, consulting `not_options` on reads
    pub fn new(hooks: Arc<H>, not_options: Arc<dyn NotOptionCache>) -> Self {
        Self {
            hooks,
            not_options,
            pending: Arc::new(PendingState::new()),
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Register an option and bind its hooks
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the schema is invalid or the name is
    /// already registered. Nothing is bound in either case.
    pub fn register(&self, schema: OptionSchema) -> Result<()> {
        schema.validate_schema()?;

        let schema = Arc::new(schema);
        {
            let mut schemas = self.schemas.write_recovered();
            if schemas.contains_key(schema.name()) {
                warn!("Option '{}' is already registered", schema.name());
                return Err(Error::Config(format!(
                    "Option '{}' is already registered",
                    schema.name()
                )));
            }
            schemas.insert(schema.name().to_string(), Arc::clone(&schema));
        }

        self.bind(&schema);
        info!(
            "Registered option '{}' ({}, {:?}, {:?})",
            schema.name(),
            schema.declared_type(),
            schema.strictness(),
            schema.scope()
        );
        Ok(())
    }

    /// Register several options, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first registration error.
    pub fn register_all(&self, schemas: impl IntoIterator<Item = OptionSchema>) -> Result<()> {
        schemas.into_iter().try_for_each(|schema| self.register(schema))
    }

    fn bind(&self, schema: &Arc<OptionSchema>) {
        let name = schema.name();
        let priority = schema.priority();

        self.hooks.add_filter(
            Hook::SanitizeOnWrite,
            name,
            priority,
            filter(|value, _| Ok(envelope::sanitize(value))),
        );

        if schema.strictness().is_strict() {
            let validator = Arc::new(schema.validator());
            for hook in [Hook::ValidateOnAdd, Hook::ValidateOnUpdate] {
                let validator = Arc::clone(&validator);
                self.hooks.add_filter(
                    hook,
                    name,
                    priority,
                    filter(move |value, _| {
                        validator.validate(&value)?;
                        Ok(value)
                    }),
                );
            }
        }

        let resolver = Arc::new(DefaultResolver::new(
            Arc::clone(schema),
            Arc::clone(&self.pending),
            Arc::clone(&self.not_options),
        ));

        match schema.scope() {
            StoreScope::Site => {
                let on_default = Arc::clone(&resolver);
                self.hooks.add_filter(
                    Hook::ResolveDefault,
                    name,
                    priority,
                    filter(move |value, args| {
                        on_default.resolve_site_default(value, args.passed_default)
                    }),
                );
                self.hooks.add_filter(
                    Hook::ResolveValue,
                    name,
                    priority,
                    filter(move |value, _| resolver.resolve_site_value(value)),
                );
            }
            StoreScope::Network => {
                let on_default = Arc::clone(&resolver);
                self.hooks.add_filter(
                    Hook::ResolveDefault,
                    name,
                    priority,
                    filter(move |value, args| on_default.resolve_default(value, args.scope_id)),
                );
                self.hooks.add_filter(
                    Hook::ResolveValue,
                    name,
                    priority,
                    filter(move |value, args| resolver.resolve_value(value, args.scope_id)),
                );

                let pending = Arc::clone(&self.pending);
                self.hooks.add_action(
                    Hook::AddStarted,
                    name,
                    priority,
                    action(move |args| pending.begin(args.option)),
                );
                let pending = Arc::clone(&self.pending);
                self.hooks.add_action(
                    Hook::AddCompleted,
                    name,
                    priority,
                    action(move |args| pending.finish(args.option)),
                );
            }
        }

        debug!("Bound hooks for option '{name}' at priority {priority}");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn schema(&self, name: &str) -> Option<Arc<OptionSchema>> {
        self.schemas.read_recovered().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read_recovered().contains_key(name)
    }

    /// Registered option names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read_recovered().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.read_recovered().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pending-add state shared by this registry's network-scoped options
    pub fn pending(&self) -> &Arc<PendingState> {
        &self.pending
    }

    pub fn hooks(&self) -> &Arc<H> {
        &self.hooks
    }

    /// REST-introspection schema fragments for every registered option
    #[cfg(feature = "introspection")]
    pub fn rest_schemas(&self) -> serde_json::Map<String, serde_json::Value> {
        let schemas = self.schemas.read_recovered();
        let mut names: Vec<&String> = schemas.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| (name.clone(), crate::introspection::rest_schema(&schemas[name])))
            .collect()
    }
}

impl<H: HookHost> std::fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("options", &self.names())
            .field("pending", &self.pending)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
