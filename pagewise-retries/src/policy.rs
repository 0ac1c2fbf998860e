//! Retry policies.
//!
//! A [`RetryPolicy`] decides, per attempt, whether an observed failure is
//! worth retrying and how long to wait before the next attempt. Policies are
//! immutable after construction and hold no per-call state, so a single
//! instance is safe to share across concurrent fetch loops.

use crate::backoff::{ExponentialBackoff, FixedDelay};
use crate::error::{FailureKind, RetryError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// HTTP statuses retried by default: request timeout, rate limiting, and the
/// transient 5xx family.
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Failure classes retried by default.
pub fn default_retryable_kinds() -> HashSet<FailureKind> {
    [
        FailureKind::Timeout,
        FailureKind::Connection,
        FailureKind::Transport,
    ]
    .into_iter()
    .collect()
}

/// Trait for retry policies.
///
/// The default wait behavior is a plain `2^attempt` seconds; concrete
/// policies override [`backoff_delay`](RetryPolicy::backoff_delay) to supply
/// their own schedule.
#[async_trait]
pub trait RetryPolicy: Send + Sync {
    /// Number of retries beyond the first attempt.
    fn max_retries(&self) -> u32;

    /// Whether a response status should trigger a retry.
    fn is_retryable_status(&self, status: u16) -> bool;

    /// Whether a failed call should trigger a retry.
    fn is_retryable_error(&self, error: &RetryError) -> bool;

    /// Delay before the retry following the given attempt (0-based).
    fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs(2u64.saturating_pow(attempt))
    }

    /// Suspend until the next attempt may start.
    async fn wait_before_retry(&self, attempt: u32) {
        let delay = self.backoff_delay(attempt);
        debug!(attempt, delay_ms = delay.as_millis() as u64, "waiting before retry");
        sleep(delay).await;
    }
}

/// Retry policy with exponential backoff.
///
/// Implements exponential backoff with optional jitter, which helps prevent
/// the thundering-herd problem when many clients retry in lockstep.
#[derive(Debug, Clone)]
pub struct ExponentialBackoffPolicy {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// HTTP statuses that trigger a retry.
    pub retryable_status_codes: HashSet<u16>,
    /// Failure classes that trigger a retry.
    pub retryable_kinds: HashSet<FailureKind>,
    /// Backoff schedule.
    pub backoff: ExponentialBackoff,
}

impl Default for ExponentialBackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
            retryable_kinds: default_retryable_kinds(),
            backoff: ExponentialBackoff::default(),
        }
    }
}

impl ExponentialBackoffPolicy {
    /// Create a policy with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RetryPolicy for ExponentialBackoffPolicy {
    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    fn is_retryable_error(&self, error: &RetryError) -> bool {
        match error {
            RetryError::Http { status, .. } => self.is_retryable_status(*status),
            other => self.retryable_kinds.contains(&other.kind()),
        }
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Retry policy with a fixed delay between attempts.
#[derive(Debug, Clone)]
pub struct FixedDelayPolicy {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// HTTP statuses that trigger a retry.
    pub retryable_status_codes: HashSet<u16>,
    /// Failure classes that trigger a retry.
    pub retryable_kinds: HashSet<FailureKind>,
    /// Fixed wait between attempts.
    pub delay: FixedDelay,
}

impl Default for FixedDelayPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
            retryable_kinds: default_retryable_kinds(),
            delay: FixedDelay::default(),
        }
    }
}

impl FixedDelayPolicy {
    /// Create a policy waiting `delay` between attempts.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: FixedDelay::new(delay),
            ..Self::default()
        }
    }
}

#[async_trait]
impl RetryPolicy for FixedDelayPolicy {
    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    fn is_retryable_error(&self, error: &RetryError) -> bool {
        match error {
            RetryError::Http { status, .. } => self.is_retryable_status(*status),
            other => self.retryable_kinds.contains(&other.kind()),
        }
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.delay.delay(attempt)
    }
}
