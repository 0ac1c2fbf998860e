//! Named-strategy registry.

use crate::strategies::{HateoasStrategy, PageNumberStrategy};
use crate::strategy::PaginationStrategy;
use pagewise_retries::RegistryError;
use std::collections::BTreeMap;
use tracing::debug;

/// Factory producing a fresh strategy instance per lookup.
pub type StrategyFactory = Box<dyn Fn() -> Box<dyn PaginationStrategy> + Send + Sync>;

/// Registry name of the built-in page-number strategy.
pub const PAGE_NUMBER: &str = "page_number";
/// Registry name of the built-in HATEOAS strategy.
pub const HATEOAS: &str = "hateoas";

/// Registry of pagination strategies, selectable by name.
///
/// Mirrors [`pagewise_retries::RetryRegistry`]: factories rather than
/// singletons, a default-selection slot cleared when its entry is removed,
/// and setup-phase-only mutation. The full strategy capability set
/// (`get_next_page_info`, `extract_items`, `extract_data`) is enforced by
/// the `dyn PaginationStrategy` factory signature, so incompatible types
/// fail at registration-site compile time rather than inside the fetch loop.
#[derive(Default)]
pub struct PaginationRegistry {
    strategies: BTreeMap<String, StrategyFactory>,
    default_name: Option<String>,
}

impl std::fmt::Debug for PaginationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationRegistry")
            .field("names", &self.names())
            .field("default_name", &self.default_name)
            .finish()
    }
}

impl PaginationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-seeded with the built-in strategies.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register a strategy factory under a name.
    ///
    /// A name can only be registered once; re-registering requires an
    /// explicit [`unregister`](Self::unregister) first.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: StrategyFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.strategies.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        debug!(name = %name, "registered pagination strategy");
        self.strategies.insert(name, factory);
        Ok(())
    }

    /// Remove a registered strategy.
    ///
    /// Clears the default if it pointed at the removed entry.
    pub fn unregister(&mut self, name: &str) -> Result<(), RegistryError> {
        if self.strategies.remove(name).is_none() {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if self.default_name.as_deref() == Some(name) {
            debug!(name, "cleared default pagination strategy");
            self.default_name = None;
        }
        debug!(name, "unregistered pagination strategy");
        Ok(())
    }

    /// Select the default strategy by name.
    pub fn set_default(&mut self, name: &str) -> Result<(), RegistryError> {
        if !self.strategies.contains_key(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        debug!(name, "set default pagination strategy");
        self.default_name = Some(name.to_string());
        Ok(())
    }

    /// Construct a strategy by name, or the default when `name` is `None`.
    pub fn get(&self, name: Option<&str>) -> Result<Box<dyn PaginationStrategy>, RegistryError> {
        let name = match name {
            Some(name) => name,
            None => self.default_name.as_deref().ok_or(RegistryError::NoDefault)?,
        };
        let factory = self
            .strategies
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(factory())
    }

    /// Names of all registered strategies.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// Name of the current default, if any.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Seed the built-in strategies.
    ///
    /// Idempotent: names already present are left untouched, and HATEOAS is
    /// only made the default when no default exists.
    pub fn register_builtins(&mut self) {
        if !self.strategies.contains_key(PAGE_NUMBER) {
            let factory: StrategyFactory = Box::new(|| Box::new(PageNumberStrategy::new()));
            let _ = self.register(PAGE_NUMBER, factory);
        }
        if !self.strategies.contains_key(HATEOAS) {
            let factory: StrategyFactory = Box::new(|| Box::new(HateoasStrategy::new()));
            let _ = self.register(HATEOAS, factory);
        }
        if self.default_name.is_none() {
            let _ = self.set_default(HATEOAS);
        }
    }
}
