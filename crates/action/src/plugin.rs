use crate::registry::ActionRegistry;

/// A packaging unit that contributes one or more actions.
///
/// Plugins register their actions once, while the host process assembles
/// its [`ActionRegistry`].
pub trait Plugin: Send + Sync {
    /// Plugin name, used for logging.
    fn name(&self) -> &str;

    /// Add this plugin's actions to `registry`.
    fn register(&self, registry: &mut ActionRegistry);
}
