/// Error type for all action operations.
///
/// Each variant is one of the per-item failure kinds. Display strings end
/// up verbatim in output records, so no variant ever carries a credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ActionError {
    /// The raw request could not be decoded into the action's input type.
    #[error("invalid param: {0}")]
    InvalidParam(String),

    /// A required field is missing or malformed.
    #[error("validation: {0}")]
    Validation(String),

    /// The remote artifact could not be retrieved.
    #[error("fetch failed for '{endpoint}': {reason}")]
    Fetch {
        /// Endpoint reference as supplied by the caller.
        endpoint: String,
        /// Underlying storage / network failure.
        reason: String,
    },

    /// The stored secret could not be recovered.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The external operation failed to launch or exited unsuccessfully.
    #[error("execution failed: {message}, output={output}")]
    Execution {
        /// What went wrong (exit status, launch failure).
        message: String,
        /// Captured combined output, kept for diagnostics.
        output: String,
    },
}

/// Coarse classification of an [`ActionError`], useful for logging fields
/// and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ActionError::InvalidParam`].
    InvalidParam,
    /// See [`ActionError::Validation`].
    Validation,
    /// See [`ActionError::Fetch`].
    Fetch,
    /// See [`ActionError::Decryption`].
    Decryption,
    /// See [`ActionError::Execution`].
    Execution,
}

impl ErrorKind {
    /// Stable lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParam => "invalid_param",
            Self::Validation => "validation",
            Self::Fetch => "fetch",
            Self::Decryption => "decryption",
            Self::Execution => "execution",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ActionError {
    /// Create an invalid-param error.
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        Self::InvalidParam(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a fetch error for `endpoint`.
    pub fn fetch(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create a decryption error.
    pub fn decryption(msg: impl Into<String>) -> Self {
        Self::Decryption(msg.into())
    }

    /// Create an execution error carrying captured output.
    pub fn execution(msg: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Execution {
            message: msg.into(),
            output: output.into(),
        }
    }

    /// The failure kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParam(_) => ErrorKind::InvalidParam,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Decryption(_) => ErrorKind::Decryption,
            Self::Execution { .. } => ErrorKind::Execution,
        }
    }

    /// Captured process output, for execution errors.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::Execution { output, .. } => Some(output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ActionError::invalid_param("expected object"), "invalid param: expected object")]
    #[case(ActionError::validation("Host is empty"), "validation: Host is empty")]
    #[case(
        ActionError::fetch("s3://b/k.sql", "access denied"),
        "fetch failed for 's3://b/k.sql': access denied"
    )]
    #[case(ActionError::decryption("bad key"), "decryption failed: bad key")]
    #[case(
        ActionError::execution("exit status: 1", "ERROR 1064"),
        "execution failed: exit status: 1, output=ERROR 1064"
    )]
    fn display_formatting(#[case] err: ActionError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[rstest]
    #[case(ActionError::invalid_param("x"), ErrorKind::InvalidParam)]
    #[case(ActionError::validation("x"), ErrorKind::Validation)]
    #[case(ActionError::fetch("e", "x"), ErrorKind::Fetch)]
    #[case(ActionError::decryption("x"), ErrorKind::Decryption)]
    #[case(ActionError::execution("x", ""), ErrorKind::Execution)]
    fn kind_matches_variant(#[case] err: ActionError, #[case] kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn captured_output_only_on_execution() {
        let err = ActionError::execution("exit status: 1", "syntax error near 'SELEC'");
        assert_eq!(err.captured_output(), Some("syntax error near 'SELEC'"));
        assert!(ActionError::validation("x").captured_output().is_none());
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(ErrorKind::Execution.to_string(), "execution");
        assert_eq!(ErrorKind::InvalidParam.as_str(), "invalid_param");
    }
}
