//! Logger errors

use thiserror::Error;

/// Result type for logger setup
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while installing the global subscriber
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The filter directive string could not be parsed
    #[error("invalid log filter '{0}'")]
    Filter(String),

    /// A global subscriber is already installed
    #[error("logger already initialized: {0}")]
    AlreadyInit(String),

    /// Unknown output format name
    #[error("unknown log format '{0}' (expected pretty, compact or json)")]
    Format(String),
}
