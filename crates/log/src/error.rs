//! Logger errors

use thiserror::Error;

/// Result type for logger setup
pub type LogResult<T> = Result<T, LogError>;

/// Logger setup failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The filter directive string does not parse.
    #[error("invalid filter: {0}")]
    Filter(String),

    /// A configuration value is invalid.
    #[error("invalid config: {0}")]
    Config(String),

    /// A global subscriber is already installed.
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
}
