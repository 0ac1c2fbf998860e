//! Retry error types and failure classification.

use thiserror::Error;

/// Failures that the retry engine can observe and classify.
#[derive(Debug, Error)]
pub enum RetryError {
    /// HTTP error with status code.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, if captured.
        body: String,
    },

    /// The call exceeded its deadline.
    #[error("Timeout")]
    Timeout,

    /// Connection could not be established or was dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Generic client-transport failure (protocol, decode, redirect, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Other error, not classified as transport.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Coarse failure classes used by retry policies.
///
/// Policies decide retryability per class rather than per concrete error,
/// mirroring how HTTP statuses are matched against a retryable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Deadline exceeded.
    Timeout,
    /// Connection-level failure.
    Connection,
    /// Generic client-transport failure.
    Transport,
    /// HTTP status carried as an error.
    Http,
    /// Everything else.
    Other,
}

impl RetryError {
    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a generic transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http { .. } => FailureKind::Http,
            Self::Timeout => FailureKind::Timeout,
            Self::Connection(_) => FailureKind::Connection,
            Self::Transport(_) => FailureKind::Transport,
            Self::Other(_) => FailureKind::Other,
        }
    }

    /// Get the HTTP status if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RetryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RetryError::Timeout
        } else if err.is_connect() {
            RetryError::Connection(err.to_string())
        } else {
            RetryError::Transport(err.to_string())
        }
    }
}

/// Result type for retry operations.
pub type RetryResult<T> = Result<T, RetryError>;

/// Configuration-time failures from the policy and strategy registries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The requested name is not registered.
    #[error("'{0}' is not registered")]
    NotFound(String),

    /// No name was given and no default is set.
    #[error("no default is set")]
    NoDefault,

    /// The name is already registered.
    #[error("'{0}' is already registered")]
    Duplicate(String),
}
