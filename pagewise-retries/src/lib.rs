//! # pagewise-retries
//!
//! Retry policies and backoff scheduling for pagewise.
//!
//! This crate wraps arbitrary asynchronous calls with bounded attempts,
//! classified failure detection, and backoff scheduling.
//!
//! ## Core Concepts
//!
//! - **[`RetryPolicy`]**: decide retry/no-retry per attempt and own the wait
//! - **[`ExponentialBackoff`] / [`FixedDelay`]**: pure attempt-to-delay math
//! - **[`execute_with_retry`]**: run a call under a policy
//! - **[`RetryRegistry`]**: named policies with a default-selection slot
//! - **[`RetryOptions`]**: the recognized configuration surface
//!
//! ## Example
//!
//! ```ignore
//! use pagewise_retries::{execute_with_retry, RetryOptions};
//! use std::time::Duration;
//!
//! let policy = RetryOptions::new()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build_exponential();
//!
//! let response = execute_with_retry(&policy, || async {
//!     // Your async call here
//!     perform_call().await
//! }).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backoff;
pub mod config;
pub mod error;
pub mod executor;
pub mod policy;
pub mod registry;

// Re-exports
pub use backoff::{ExponentialBackoff, FixedDelay};
pub use config::RetryOptions;
pub use error::{FailureKind, RegistryError, RetryError, RetryResult};
pub use executor::{execute_with_retry, HasStatus};
pub use policy::{
    ExponentialBackoffPolicy, FixedDelayPolicy, RetryPolicy, DEFAULT_RETRYABLE_STATUS_CODES,
};
pub use registry::{PolicyFactory, RetryRegistry, EXPONENTIAL_BACKOFF, FIXED_DELAY};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        execute_with_retry, ExponentialBackoffPolicy, FailureKind, FixedDelayPolicy, HasStatus,
        RetryOptions, RetryPolicy, RetryRegistry, RetryResult,
    };
}
