use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// Opaque caller-supplied value echoed back verbatim on every output record.
///
/// The dispatcher never inspects it; it is `null` when the caller sent none.
pub type CallBackParameter = serde_json::Value;

/// Two-valued per-item result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    /// The item completed without error.
    #[default]
    Success,
    /// The item failed; the accompanying message says why.
    Error,
}

impl ResultCode {
    /// Maps "was there an error?" onto a result code.
    ///
    /// An error present always yields [`ResultCode::Error`].
    pub fn from_error<E>(error: Option<&E>) -> Self {
        match error {
            Some(_) => Self::Error,
            None => Self::Success,
        }
    }

    /// Returns `true` for [`ResultCode::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// The `result` object attached to every output record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionResult {
    /// Success or error.
    pub code: ResultCode,
    /// Error text on failure, empty on success.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl ActionResult {
    /// A successful result with an empty message.
    pub fn success() -> Self {
        Self {
            code: ResultCode::Success,
            message: String::new(),
        }
    }

    /// A failed result carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: ResultCode::Error,
            message: message.into(),
        }
    }

    /// Builds the result for an optional error: the error's display text
    /// becomes the message.
    pub fn from_error(error: Option<&ActionError>) -> Self {
        match error {
            Some(err) => Self::error(err.to_string()),
            None => Self::success(),
        }
    }
}

/// Output of a batch-level `Do` call: the full output plus one aggregate
/// error signal.
///
/// The output is always complete, even when `error` is set. The error does
/// not say which items failed; callers inspect each item's [`ResultCode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    /// The produced output.
    pub output: T,
    /// Aggregate failure signal, `None` when every item succeeded.
    pub error: Option<ActionError>,
}

impl<T> Outcome<T> {
    /// An outcome with no error.
    pub fn ok(output: T) -> Self {
        Self {
            output,
            error: None,
        }
    }

    /// An outcome carrying both output and an aggregate error.
    pub fn with_error(output: T, error: Option<ActionError>) -> Self {
        Self { output, error }
    }

    /// Returns `true` when no aggregate error is set.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Maps the output, keeping the error.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            output: f(self.output),
            error: self.error,
        }
    }

    /// Collapses into a `Result`, discarding the output on failure.
    pub fn into_result(self) -> Result<T, ActionError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn result_code_wire_format() {
        assert_eq!(
            serde_json::to_value(ResultCode::Success).unwrap(),
            serde_json::json!("SUCCESS")
        );
        assert_eq!(
            serde_json::to_value(ResultCode::Error).unwrap(),
            serde_json::json!("ERROR")
        );
        let parsed: ResultCode = serde_json::from_str("\"ERROR\"").unwrap();
        assert_eq!(parsed, ResultCode::Error);
    }

    #[test]
    fn error_present_maps_to_error_code() {
        let err = ActionError::validation("Host is empty");
        assert_eq!(ResultCode::from_error(Some(&err)), ResultCode::Error);
        assert_eq!(ResultCode::from_error::<ActionError>(None), ResultCode::Success);
    }

    #[test]
    fn action_result_from_error_carries_message() {
        let err = ActionError::fetch("s3://bucket/a.sql", "no such key");
        let result = ActionResult::from_error(Some(&err));
        assert_eq!(result.code, ResultCode::Error);
        assert_eq!(result.message, err.to_string());

        let ok = ActionResult::from_error(None);
        assert_eq!(ok, ActionResult::success());
    }

    #[test]
    fn success_result_omits_empty_message() {
        let json = serde_json::to_value(ActionResult::success()).unwrap();
        assert_eq!(json, serde_json::json!({"code": "SUCCESS"}));
    }

    #[test]
    fn outcome_into_result() {
        let ok: Outcome<u32> = Outcome::ok(3);
        assert!(ok.is_success());
        assert_eq!(ok.into_result().unwrap(), 3);

        let failed = Outcome::with_error(vec![1, 2], Some(ActionError::decryption("bad key")));
        assert!(!failed.is_success());
        let mapped = failed.map(|v| v.len());
        assert_eq!(mapped.output, 2);
        assert!(mapped.into_result().is_err());
    }
}
