//! The paged fetch loop.

use crate::config::PagedFetcherBuilder;
use crate::error::FetchResult;
use crate::response::PageResponse;
use crate::strategy::{PageParams, PaginationStrategy};
use futures::stream::{self, Stream, TryStreamExt};
use pagewise_retries::{execute_with_retry, RetryPolicy, RetryResult};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates paged fetching: runs each page's call under a retry policy,
/// extracts the item batch, and threads next-page parameters forward until
/// the strategy reports exhaustion or a page cap is reached.
///
/// Pages are inherently serially dependent (page N+1's parameters are only
/// known after page N's body is inspected), so the loop performs one fetch
/// at a time; independent fetchers can run concurrently since the policy and
/// strategy hold no per-call state.
#[derive(Clone)]
pub struct PagedFetcher {
    policy: Arc<dyn RetryPolicy>,
    strategy: Arc<dyn PaginationStrategy>,
    data_key: Option<String>,
    max_pages: Option<u32>,
}

impl std::fmt::Debug for PagedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedFetcher")
            .field("data_key", &self.data_key)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl PagedFetcher {
    /// Create a fetcher from a retry policy and a pagination strategy.
    pub fn new(
        policy: impl RetryPolicy + 'static,
        strategy: impl PaginationStrategy + 'static,
    ) -> Self {
        Self::from_boxed(Box::new(policy), Box::new(strategy))
    }

    /// Create a fetcher from boxed parts, as produced by the registries.
    pub fn from_boxed(
        policy: Box<dyn RetryPolicy>,
        strategy: Box<dyn PaginationStrategy>,
    ) -> Self {
        Self {
            policy: Arc::from(policy),
            strategy: Arc::from(strategy),
            data_key: None,
            max_pages: None,
        }
    }

    /// Start building a fetcher from named or configured parts.
    #[must_use]
    pub fn builder() -> PagedFetcherBuilder {
        PagedFetcherBuilder::new()
    }

    /// Extract each page's batch by dotted key path instead of the
    /// strategy's built-in item extraction.
    #[must_use]
    pub fn with_data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = Some(key.into());
        self
    }

    /// Cap the number of pages fetched. Reaching the cap is normal
    /// termination, not an error.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Fetch pages lazily, yielding one item batch per page.
    ///
    /// The stream is finite and non-restartable. An error from a page's call
    /// (after retry) or from body parsing ends the stream with that error;
    /// batches already yielded remain valid, which makes this the variant to
    /// prefer when partial results matter.
    pub fn fetch_pages<'a, F, Fut, R>(
        &'a self,
        perform_call: F,
        initial_params: PageParams,
    ) -> impl Stream<Item = FetchResult<Vec<Value>>> + 'a
    where
        F: Fn(PageParams) -> Fut + Send + 'a,
        Fut: Future<Output = RetryResult<R>> + Send,
        R: PageResponse,
    {
        let state = (perform_call, initial_params, 0u32, false);
        stream::try_unfold(state, move |(perform_call, params, page_count, done)| {
            async move {
                if done {
                    return Ok(None);
                }
                if let Some(max_pages) = self.max_pages {
                    if page_count >= max_pages {
                        info!(page_count, max_pages, "page cap reached");
                        return Ok(None);
                    }
                }

                let response =
                    execute_with_retry(self.policy.as_ref(), || perform_call(params.clone()))
                        .await?;
                let body = response.into_json()?;

                let batch = self.page_batch(&body);
                let (has_more, next_params) = self.strategy.get_next_page_info(&body, &params);
                debug!(
                    page = page_count,
                    batch_len = batch.len(),
                    has_more,
                    "fetched page"
                );

                let next_state = (perform_call, next_params, page_count + 1, !has_more);
                Ok(Some((batch, next_state)))
            }
        })
    }

    /// Fetch every page and return the flattened items.
    ///
    /// Buffered variant of [`fetch_pages`](Self::fetch_pages): on error the
    /// items accumulated from earlier pages are dropped along with the rest
    /// of the fetch. Use the streaming variant when partial results must
    /// survive a mid-fetch failure.
    pub async fn fetch_all_pages<F, Fut, R>(
        &self,
        perform_call: F,
        initial_params: PageParams,
    ) -> FetchResult<Vec<Value>>
    where
        F: Fn(PageParams) -> Fut + Send,
        Fut: Future<Output = RetryResult<R>> + Send,
        R: PageResponse,
    {
        let pages = self.fetch_pages(perform_call, initial_params);
        futures::pin_mut!(pages);

        let mut all_items = Vec::new();
        while let Some(batch) = pages.try_next().await? {
            all_items.extend(batch);
        }
        Ok(all_items)
    }

    fn page_batch(&self, body: &Value) -> Vec<Value> {
        match &self.data_key {
            Some(key) => match self.strategy.extract_data(body, Some(key)) {
                Value::Array(items) => items,
                other => vec![other],
            },
            None => self.strategy.extract_items(body),
        }
    }
}
