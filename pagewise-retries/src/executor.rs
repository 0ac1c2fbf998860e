//! Retry executor for running calls under a policy.

use crate::error::{RetryError, RetryResult};
use crate::policy::RetryPolicy;
use std::future::Future;
use tracing::{debug, error, warn};

/// Values whose HTTP status, if any, is observable by the retry engine.
///
/// A value with no status is treated as an unconditional success: status-based
/// retry only applies when status information exists.
pub trait HasStatus {
    /// HTTP status carried by this value, if any.
    fn status(&self) -> Option<u16>;
}

impl HasStatus for () {
    fn status(&self) -> Option<u16> {
        None
    }
}

/// Execute a call with retry logic.
///
/// The call is attempted up to `policy.max_retries() + 1` times. A failed
/// attempt is retried only when the policy classifies it as retryable and
/// attempts remain; a retryable HTTP status on a returned value is treated
/// like a failure and synthesized into [`RetryError::Http`]. After
/// exhaustion the last-observed failure propagates.
///
/// # Example
///
/// ```ignore
/// use pagewise_retries::{execute_with_retry, ExponentialBackoffPolicy};
///
/// let policy = ExponentialBackoffPolicy::new();
/// let value = execute_with_retry(&policy, || async {
///     // Your async call here
///     Ok(())
/// }).await?;
/// ```
pub async fn execute_with_retry<P, F, Fut, T>(policy: &P, call: F) -> RetryResult<T>
where
    P: RetryPolicy + ?Sized,
    F: Fn() -> Fut,
    Fut: Future<Output = RetryResult<T>>,
    T: HasStatus,
{
    let max_retries = policy.max_retries();
    let mut attempt: u32 = 0;

    loop {
        debug!(attempt, max_retries, "executing attempt");

        let pending = match call().await {
            Ok(value) => match value.status() {
                Some(status) if policy.is_retryable_status(status) => {
                    warn!(status, attempt, "received retryable status code");
                    RetryError::http(status, format!("HTTP {status}"))
                }
                _ => return Ok(value),
            },
            Err(err) => {
                if policy.is_retryable_error(&err) {
                    warn!(attempt, error = %err, "attempt failed with retryable error");
                    err
                } else {
                    warn!(error = %err, "not retrying after non-retryable error");
                    return Err(err);
                }
            }
        };

        if attempt >= max_retries {
            error!(attempts = max_retries + 1, error = %pending, "all attempts failed");
            return Err(pending);
        }

        policy.wait_before_retry(attempt).await;
        attempt += 1;
    }
}
