//! Backoff calculators.
//!
//! Pure attempt-to-delay functions, kept separate from the retry policies
//! that schedule them so delay math can be tested without sleeping.

use std::time::Duration;

/// Exponential backoff with an upper cap and optional multiplicative jitter.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Cap applied to the un-jittered delay.
    pub max_delay: Duration,
    /// Growth factor per attempt.
    pub backoff_factor: f64,
    /// Whether to randomize each delay by a factor in `[0.5, 1.5)`.
    pub jitter: bool,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl ExponentialBackoff {
    /// Create a backoff with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate the delay for a retry attempt (0-based).
    ///
    /// `min(max_delay, initial_delay * backoff_factor^attempt)`, then scaled
    /// by a uniformly random factor in `[0.5, 1.5)` when jitter is enabled.
    /// The jitter is multiplicative and applied once per computed delay, so
    /// callers that need strictly monotonic growth must disable it.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_with_draw(attempt, rand_unit())
    }

    /// Calculate the delay using an explicit random draw in `[0, 1)`.
    ///
    /// A draw of `0.5` yields exactly the un-jittered delay. Exposed so the
    /// jitter window can be pinned in tests.
    pub fn delay_with_draw(&self, attempt: u32, draw: f64) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let mut delay = base.min(self.max_delay.as_secs_f64());
        if self.jitter {
            delay *= 0.5 + draw;
        }
        Duration::from_secs_f64(delay.max(0.0))
    }
}

/// Fixed delay regardless of attempt.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    /// Delay between attempts.
    pub delay: Duration,
}

impl FixedDelay {
    /// Create a fixed-delay calculator.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Calculate the delay for a retry attempt.
    pub fn delay(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

/// Uniform random draw in `[0, 1)`.
fn rand_unit() -> f64 {
    use rand::Rng;
    rand::thread_rng().gen::<f64>()
}
