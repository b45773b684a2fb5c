//! Type-erased action handler stored in the registry.
//!
//! Action authors implement [`Action`]; [`ActionAdapter`] bridges it to the
//! JSON-in / JSON-out [`ActionHandler`] that callers resolve by name.

use async_trait::async_trait;
use serde::Serialize;

use crate::action::Action;
use crate::error::ActionError;
use crate::metadata::ActionMetadata;
use crate::result::Outcome;

/// Type-erased action handler used by the registry.
#[async_trait]
pub trait ActionHandler: Send + Sync + 'static {
    /// The action's static metadata.
    fn metadata(&self) -> &ActionMetadata;

    /// Decode `raw`, execute it and serialise the output.
    ///
    /// Returns `Err` only when `raw` cannot be decoded (or the output
    /// cannot be serialised); execution failures travel inside the
    /// [`Outcome`].
    async fn dispatch(&self, raw: serde_json::Value)
    -> Result<Outcome<serde_json::Value>, ActionError>;
}

/// Wraps a typed [`Action`] as an [`ActionHandler`].
pub struct ActionAdapter<A> {
    action: A,
}

impl<A> ActionAdapter<A> {
    /// Wrap `action`.
    pub fn new(action: A) -> Self {
        Self { action }
    }

    /// The wrapped action.
    pub fn inner(&self) -> &A {
        &self.action
    }
}

#[async_trait]
impl<A> ActionHandler for ActionAdapter<A>
where
    A: Action,
    A::Output: Serialize,
{
    fn metadata(&self) -> &ActionMetadata {
        self.action.metadata()
    }

    async fn dispatch(
        &self,
        raw: serde_json::Value,
    ) -> Result<Outcome<serde_json::Value>, ActionError> {
        let key = &self.action.metadata().key;
        let input = self.action.read_param(raw).inspect_err(|e| {
            tracing::warn!(action = %key, error = %e, "rejected action params");
        })?;

        let outcome = self.action.execute(input).await;
        let output = serde_json::to_value(&outcome.output)
            .map_err(|e| ActionError::invalid_param(format!("unserialisable output: {e}")))?;

        Ok(Outcome::with_error(output, outcome.error))
    }
}

impl<A> std::fmt::Debug for ActionAdapter<A>
where
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionAdapter")
            .field("key", &self.action.metadata().key)
            .finish()
    }
}
