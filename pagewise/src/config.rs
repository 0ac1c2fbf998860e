//! Fetcher configuration.

use crate::fetcher::PagedFetcher;
use crate::registry::{PaginationRegistry, PAGE_NUMBER};
use crate::strategies::PageNumberStrategy;
use crate::strategy::PaginationStrategy;
use pagewise_retries::{RegistryError, RetryOptions, RetryPolicy, RetryRegistry};

/// The recognized pagination options.
#[derive(Debug, Clone)]
pub struct PaginationOptions {
    /// Registry name of the strategy, `None` for the registry default.
    pub strategy_name: Option<String>,
    /// Request parameter holding the page counter (page-number strategy).
    pub page_param_name: String,
    /// Page indexing convention (page-number strategy).
    pub zero_indexed: bool,
    /// Dotted key path for batch extraction, `None` for the strategy's
    /// built-in item extraction.
    pub data_key: Option<String>,
    /// Page cap, `None` for unbounded.
    pub max_pages: Option<u32>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            strategy_name: None,
            page_param_name: "page".to_string(),
            zero_indexed: true,
            data_key: None,
            max_pages: None,
        }
    }
}

/// Builder assembling a [`PagedFetcher`] from options, names, or instances.
///
/// Names resolve through the registries at [`build`](Self::build) time, so
/// configuration failures (unknown names, missing defaults) surface here
/// and never inside the fetch loop.
pub struct PagedFetcherBuilder {
    policy: Option<Box<dyn RetryPolicy>>,
    policy_name: Option<String>,
    retry: Option<RetryOptions>,
    strategy: Option<Box<dyn PaginationStrategy>>,
    pagination: PaginationOptions,
    retry_registry: Option<RetryRegistry>,
    pagination_registry: Option<PaginationRegistry>,
}

impl Default for PagedFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PagedFetcherBuilder {
    /// Create a builder with the default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: None,
            policy_name: None,
            retry: None,
            strategy: None,
            pagination: PaginationOptions::default(),
            retry_registry: None,
            pagination_registry: None,
        }
    }

    /// Use a concrete retry policy instance.
    #[must_use]
    pub fn policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Resolve the retry policy by registry name.
    #[must_use]
    pub fn policy_name(mut self, name: impl Into<String>) -> Self {
        self.policy_name = Some(name.into());
        self
    }

    /// Build the retry policy from options (exponential backoff).
    #[must_use]
    pub fn retry_options(mut self, options: RetryOptions) -> Self {
        self.retry = Some(options);
        self
    }

    /// Use a concrete pagination strategy instance.
    #[must_use]
    pub fn strategy(mut self, strategy: impl PaginationStrategy + 'static) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    /// Resolve the pagination strategy by registry name.
    #[must_use]
    pub fn strategy_name(mut self, name: impl Into<String>) -> Self {
        self.pagination.strategy_name = Some(name.into());
        self
    }

    /// Replace the full pagination option set.
    #[must_use]
    pub fn pagination_options(mut self, options: PaginationOptions) -> Self {
        self.pagination = options;
        self
    }

    /// Set the page parameter name (page-number strategy).
    #[must_use]
    pub fn page_param_name(mut self, name: impl Into<String>) -> Self {
        self.pagination.page_param_name = name.into();
        self
    }

    /// Set the page indexing convention (page-number strategy).
    #[must_use]
    pub fn zero_indexed(mut self, zero_indexed: bool) -> Self {
        self.pagination.zero_indexed = zero_indexed;
        self
    }

    /// Extract batches by dotted key path.
    #[must_use]
    pub fn data_key(mut self, key: impl Into<String>) -> Self {
        self.pagination.data_key = Some(key.into());
        self
    }

    /// Cap the number of pages fetched.
    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.pagination.max_pages = Some(max_pages);
        self
    }

    /// Resolve policy names against a custom registry instead of the
    /// built-in one.
    #[must_use]
    pub fn retry_registry(mut self, registry: RetryRegistry) -> Self {
        self.retry_registry = Some(registry);
        self
    }

    /// Resolve strategy names against a custom registry instead of the
    /// built-in one.
    #[must_use]
    pub fn pagination_registry(mut self, registry: PaginationRegistry) -> Self {
        self.pagination_registry = Some(registry);
        self
    }

    /// Assemble the fetcher.
    ///
    /// Resolution order for the policy: explicit instance, then retry
    /// options, then registry name (or the registry default). The strategy
    /// resolves the same way, except that the built-in page-number name is
    /// constructed directly so the `page_param_name`/`zero_indexed` options
    /// take effect.
    pub fn build(self) -> Result<PagedFetcher, RegistryError> {
        let policy: Box<dyn RetryPolicy> = match (self.policy, self.retry) {
            (Some(policy), _) => policy,
            (None, Some(options)) => Box::new(options.build_exponential()),
            (None, None) => {
                let registry = self
                    .retry_registry
                    .unwrap_or_else(RetryRegistry::with_builtins);
                registry.get(self.policy_name.as_deref())?
            }
        };

        let strategy: Box<dyn PaginationStrategy> = match self.strategy {
            Some(strategy) => strategy,
            None if self.pagination.strategy_name.as_deref() == Some(PAGE_NUMBER) => {
                Box::new(PageNumberStrategy {
                    zero_indexed: self.pagination.zero_indexed,
                    page_param: self.pagination.page_param_name.clone(),
                })
            }
            None => {
                let registry = self
                    .pagination_registry
                    .unwrap_or_else(PaginationRegistry::with_builtins);
                registry.get(self.pagination.strategy_name.as_deref())?
            }
        };

        let mut fetcher = PagedFetcher::from_boxed(policy, strategy);
        if let Some(key) = self.pagination.data_key {
            fetcher = fetcher.with_data_key(key);
        }
        if let Some(max_pages) = self.pagination.max_pages {
            fetcher = fetcher.with_max_pages(max_pages);
        }
        Ok(fetcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HATEOAS;

    #[test]
    fn test_defaults_build() {
        // Registry defaults: exponential backoff + HATEOAS.
        let fetcher = PagedFetcherBuilder::new().build().unwrap();
        assert!(format!("{fetcher:?}").contains("PagedFetcher"));
    }

    #[test]
    fn test_unknown_strategy_name_fails_at_build() {
        let result = PagedFetcherBuilder::new().strategy_name("cursor").build();
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_unknown_policy_name_fails_at_build() {
        let result = PagedFetcherBuilder::new().policy_name("bogus").build();
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_named_parts_resolve() {
        let fetcher = PagedFetcherBuilder::new()
            .policy_name(pagewise_retries::FIXED_DELAY)
            .strategy_name(HATEOAS)
            .max_pages(5)
            .build();
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_page_number_options_take_effect() {
        // Builds without touching the registry so the options apply.
        let fetcher = PagedFetcherBuilder::new()
            .strategy_name(PAGE_NUMBER)
            .page_param_name("pageNo")
            .zero_indexed(false)
            .data_key("_embedded.rows")
            .build();
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_empty_registry_has_no_default() {
        let result = PagedFetcherBuilder::new()
            .pagination_registry(PaginationRegistry::new())
            .build();
        assert!(matches!(result, Err(RegistryError::NoDefault)));
    }
}
