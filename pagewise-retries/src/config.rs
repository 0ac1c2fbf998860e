//! Retry configuration.

use crate::backoff::{ExponentialBackoff, FixedDelay};
use crate::error::FailureKind;
use crate::policy::{
    default_retryable_kinds, ExponentialBackoffPolicy, FixedDelayPolicy,
    DEFAULT_RETRYABLE_STATUS_CODES,
};
use std::collections::HashSet;
use std::time::Duration;

/// The recognized retry options, with a consuming builder API.
///
/// An options value describes *what* to retry and how backoff grows; the
/// concrete policy variant is chosen at build time via
/// [`build_exponential`](Self::build_exponential) or
/// [`build_fixed`](Self::build_fixed).
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Maximum number of retries beyond the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap on the computed delay.
    pub max_delay: Duration,
    /// Growth factor per attempt.
    pub backoff_factor: f64,
    /// Whether delays are randomized.
    pub jitter: bool,
    /// HTTP statuses that trigger a retry.
    pub retryable_status_codes: HashSet<u16>,
    /// Failure classes that trigger a retry.
    pub retryable_kinds: HashSet<FailureKind>,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
            jitter: true,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
            retryable_kinds: default_retryable_kinds(),
        }
    }
}

impl RetryOptions {
    /// Create options with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that never retry.
    pub fn no_retry() -> Self {
        Self::new().max_retries(0)
    }

    /// Set max retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the initial delay.
    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_delay = d;
        self
    }

    /// Set the delay cap.
    pub fn max_delay(mut self, d: Duration) -> Self {
        self.max_delay = d;
        self
    }

    /// Set the backoff growth factor.
    pub fn backoff_factor(mut self, f: f64) -> Self {
        self.backoff_factor = f;
        self
    }

    /// Enable or disable jitter.
    pub fn jitter(mut self, on: bool) -> Self {
        self.jitter = on;
        self
    }

    /// Replace the retryable status set.
    pub fn retryable_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_status_codes = codes.into_iter().collect();
        self
    }

    /// Replace the retryable failure-class set.
    pub fn retryable_kinds(mut self, kinds: impl IntoIterator<Item = FailureKind>) -> Self {
        self.retryable_kinds = kinds.into_iter().collect();
        self
    }

    /// Build an exponential-backoff policy from these options.
    pub fn build_exponential(self) -> ExponentialBackoffPolicy {
        ExponentialBackoffPolicy {
            max_retries: self.max_retries,
            retryable_status_codes: self.retryable_status_codes,
            retryable_kinds: self.retryable_kinds,
            backoff: ExponentialBackoff {
                initial_delay: self.initial_delay,
                max_delay: self.max_delay,
                backoff_factor: self.backoff_factor,
                jitter: self.jitter,
            },
        }
    }

    /// Build a fixed-delay policy from these options.
    ///
    /// Backoff growth options are ignored; only the retry bounds and the
    /// retryable sets carry over.
    pub fn build_fixed(self, delay: Duration) -> FixedDelayPolicy {
        FixedDelayPolicy {
            max_retries: self.max_retries,
            retryable_status_codes: self.retryable_status_codes,
            retryable_kinds: self.retryable_kinds,
            delay: FixedDelay::new(delay),
        }
    }
}
