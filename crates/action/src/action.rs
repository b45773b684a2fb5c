use async_trait::async_trait;

use crate::error::ActionError;
use crate::metadata::ActionMetadata;
use crate::result::Outcome;

/// A named operation with a uniform decode/execute contract.
///
/// `read_param` turns an opaque JSON request into the typed input;
/// `execute` runs it and always returns the full output, with an aggregate
/// error alongside when any part failed. The typed pair is erased into an
/// [`ActionHandler`](crate::ActionHandler) when registered, so the registry
/// never needs runtime type assertions.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use opsdeck_action::{Action, ActionError, ActionMetadata, Outcome};
///
/// struct Echo(ActionMetadata);
///
/// #[async_trait]
/// impl Action for Echo {
///     type Input = serde_json::Value;
///     type Output = serde_json::Value;
///
///     fn metadata(&self) -> &ActionMetadata {
///         &self.0
///     }
///
///     fn read_param(&self, raw: serde_json::Value) -> Result<Self::Input, ActionError> {
///         Ok(raw)
///     }
///
///     async fn execute(&self, input: Self::Input) -> Outcome<Self::Output> {
///         Outcome::ok(input)
///     }
/// }
/// ```
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// Decoded request type.
    type Input: Send + 'static;
    /// Produced response type.
    type Output: Send + 'static;

    /// Static metadata describing this action.
    fn metadata(&self) -> &ActionMetadata;

    /// Decode the raw request.
    ///
    /// Failing here means nothing was executed and there is no output.
    fn read_param(&self, raw: serde_json::Value) -> Result<Self::Input, ActionError>;

    /// Execute the decoded request.
    async fn execute(&self, input: Self::Input) -> Outcome<Self::Output>;
}
