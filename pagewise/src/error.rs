//! Fetch error types.

use pagewise_retries::{RegistryError, RetryError};
use thiserror::Error;

/// Errors surfaced by the paged fetch loop.
///
/// Parse failures are deliberately distinct from transport failures: a
/// malformed body from a transport call that already succeeded is a
/// data-contract violation, not a transient fault, and is never retried or
/// treated as "no more pages".
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure that survived the retry policy.
    #[error(transparent)]
    Transport(#[from] RetryError),

    /// The response body could not be parsed.
    #[error("failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration failure from a registry lookup.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_distinct_from_transport() {
        let parse: FetchError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(parse, FetchError::Parse(_)));

        let transport: FetchError = RetryError::Timeout.into();
        assert!(matches!(transport, FetchError::Transport(_)));
    }
}
