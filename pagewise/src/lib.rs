//! # pagewise
//!
//! Strategy-driven pagination engine for multi-page HTTP result sets, with
//! built-in retries.
//!
//! The caller supplies a single-call capability ("perform one HTTP call,
//! return a response-like object"); pagewise wraps it with a retry policy,
//! threads cursor/parameter state across repeated calls, extracts each
//! page's items, and decides termination with a pluggable pagination
//! strategy. Transport concerns (sessions, URLs, headers, TLS) stay with
//! the caller.
//!
//! ## Core Concepts
//!
//! - **[`PaginationStrategy`]**: decide whether another page exists and what
//!   parameters fetch it; built-ins for page-number and HATEOAS pagination
//! - **[`PagedFetcher`]**: the fetch loop, streaming
//!   ([`fetch_pages`](PagedFetcher::fetch_pages)) or buffered
//!   ([`fetch_all_pages`](PagedFetcher::fetch_all_pages))
//! - **[`PaginationRegistry`]**: named strategies with a default slot
//! - **[`PageResponse`]**: the response-like boundary contract
//!
//! ## Example
//!
//! ```ignore
//! use pagewise::{PagedFetcher, RawResponse};
//! use pagewise::strategies::HateoasStrategy;
//! use pagewise_retries::RetryOptions;
//!
//! let fetcher = PagedFetcher::new(
//!     RetryOptions::new().max_retries(3).build_exponential(),
//!     HateoasStrategy::new(),
//! )
//! .with_data_key("_embedded.events")
//! .with_max_pages(10);
//!
//! let events = fetcher
//!     .fetch_all_pages(
//!         |params| async move {
//!             let response = client.get("/events", &params).await?;
//!             RawResponse::from_reqwest(response).await
//!         },
//!         initial_params,
//!     )
//!     .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod fetcher;
pub mod registry;
pub mod response;
pub mod strategies;
pub mod strategy;

// Re-exports
pub use config::{PagedFetcherBuilder, PaginationOptions};
pub use error::{FetchError, FetchResult};
pub use fetcher::PagedFetcher;
pub use registry::{PaginationRegistry, StrategyFactory, HATEOAS, PAGE_NUMBER};
pub use response::{PageResponse, RawResponse};
pub use strategies::{HateoasStrategy, PageNumberStrategy};
pub use strategy::{PageParams, PaginationStrategy};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        FetchError, FetchResult, HateoasStrategy, PageNumberStrategy, PageParams, PagedFetcher,
        PaginationRegistry, PaginationStrategy, RawResponse,
    };
    pub use pagewise_retries::prelude::*;
}
