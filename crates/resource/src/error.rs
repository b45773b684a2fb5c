//! Error types for artifact fetching
use thiserror::Error;

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure to materialize a remote artifact locally.
///
/// Messages carry the endpoint reference but never access keys.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The endpoint reference has no supported scheme or is incomplete.
    #[error("unsupported endpoint '{endpoint}': {reason}")]
    UnsupportedEndpoint {
        /// The endpoint as supplied
        endpoint: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The artifact does not exist at the endpoint.
    #[error("artifact not found: {endpoint}")]
    NotFound {
        /// The endpoint as supplied
        endpoint: String,
    },

    /// Network, authentication or storage service failure.
    #[error("storage error for '{endpoint}': {reason}")]
    Storage {
        /// The endpoint as supplied
        endpoint: String,
        /// The failure reason reported by the storage client
        reason: String,
    },

    /// Local filesystem failure while materializing the artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tempfile::PathPersistError> for FetchError {
    fn from(err: tempfile::PathPersistError) -> Self {
        Self::Io(err.error)
    }
}

impl FetchError {
    pub(crate) fn unsupported(endpoint: &str, reason: &'static str) -> Self {
        Self::UnsupportedEndpoint {
            endpoint: endpoint.to_owned(),
            reason,
        }
    }

    /// The failure without the endpoint, for callers that report the
    /// endpoint themselves.
    pub fn reason(&self) -> String {
        match self {
            Self::UnsupportedEndpoint { reason, .. } => format!("unsupported endpoint: {reason}"),
            Self::NotFound { .. } => "artifact not found".to_owned(),
            Self::Storage { reason, .. } => reason.clone(),
            Self::Io(e) => format!("io error: {e}"),
        }
    }

    /// Whether a later attempt might succeed.
    ///
    /// Nothing in the fetch path retries on its own; this only informs callers.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Io(_))
    }
}
