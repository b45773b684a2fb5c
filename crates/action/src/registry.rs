use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::action::Action;
use crate::handler::{ActionAdapter, ActionHandler};
use crate::metadata::ActionMetadata;
use crate::plugin::Plugin;

/// Errors from registry lookup and registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No action is registered under this name.
    #[error("action not found: {name}")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// An action with this name is already registered.
    #[error("action '{name}' already registered")]
    Duplicate {
        /// The conflicting name.
        name: String,
    },
}

/// Maps action names to their handlers.
///
/// Built once during process setup and then shared by reference (or
/// `Arc`) with whatever dispatches requests; there is no global instance.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use opsdeck_action::{Action, ActionError, ActionMetadata, ActionRegistry, Outcome};
///
/// struct NoOp(ActionMetadata);
///
/// #[async_trait]
/// impl Action for NoOp {
///     type Input = ();
///     type Output = ();
///     fn metadata(&self) -> &ActionMetadata { &self.0 }
///     fn read_param(&self, _raw: serde_json::Value) -> Result<(), ActionError> { Ok(()) }
///     async fn execute(&self, _input: ()) -> Outcome<()> { Outcome::ok(()) }
/// }
///
/// let mut registry = ActionRegistry::new();
/// registry.register(NoOp(ActionMetadata::new("noop", "No-Op", "Does nothing")));
///
/// assert!(registry.get_action_by_name("noop").is_ok());
/// assert!(registry.get_action_by_name("unknown").is_err());
/// ```
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed action. Overwrites any existing action with the same key.
    pub fn register<A>(&mut self, action: A)
    where
        A: Action,
        A::Output: Serialize,
    {
        self.register_handler(Arc::new(ActionAdapter::new(action)));
    }

    /// Register a type-erased handler. Overwrites any existing action with the same key.
    pub fn register_handler(&mut self, handler: Arc<dyn ActionHandler>) {
        let key = handler.metadata().key.clone();
        tracing::debug!(action = %key, "registered action");
        self.actions.insert(key, handler);
    }

    /// Register a typed action, failing if the key is already taken.
    pub fn try_register<A>(&mut self, action: A) -> Result<(), RegistryError>
    where
        A: Action,
        A::Output: Serialize,
    {
        let key = &action.metadata().key;
        if self.actions.contains_key(key) {
            return Err(RegistryError::Duplicate { name: key.clone() });
        }
        self.register(action);
        Ok(())
    }

    /// Let `plugin` register its actions.
    pub fn register_plugin(&mut self, plugin: &dyn Plugin) {
        let before = self.actions.len();
        plugin.register(self);
        tracing::info!(
            plugin = plugin.name(),
            added = self.actions.len().saturating_sub(before),
            "registered plugin"
        );
    }

    /// Resolve an action by name.
    pub fn get_action_by_name(&self, name: &str) -> Result<Arc<dyn ActionHandler>, RegistryError> {
        self.actions
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_owned(),
            })
    }

    /// Borrow a handler by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ActionHandler>> {
        self.actions.get(name)
    }

    /// Check whether an action with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Metadata for all registered actions.
    pub fn list(&self) -> Vec<&ActionMetadata> {
        self.actions.values().map(|a| a.metadata()).collect()
    }

    /// All registered names, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("count", &self.actions.len())
            .field("keys", &self.keys())
            .finish()
    }
}
