//! Named-policy registry.

use crate::error::RegistryError;
use crate::policy::{ExponentialBackoffPolicy, FixedDelayPolicy, RetryPolicy};
use std::collections::BTreeMap;
use tracing::debug;

/// Factory producing a fresh policy instance per lookup.
pub type PolicyFactory = Box<dyn Fn() -> Box<dyn RetryPolicy> + Send + Sync>;

/// Registry name of the built-in exponential-backoff policy.
pub const EXPONENTIAL_BACKOFF: &str = "exponential_backoff";
/// Registry name of the built-in fixed-delay policy.
pub const FIXED_DELAY: &str = "fixed_delay";

/// Registry of retry policies, selectable by name.
///
/// The registry stores factories, not instances: every [`get`](Self::get)
/// constructs an independent policy. Registration and default-selection are
/// setup-phase operations; a registry is not meant to be mutated while fetch
/// loops are consulting it.
///
/// A name can only be registered once. Re-registering requires an explicit
/// [`unregister`](Self::unregister) first.
#[derive(Default)]
pub struct RetryRegistry {
    policies: BTreeMap<String, PolicyFactory>,
    default_name: Option<String>,
}

impl std::fmt::Debug for RetryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryRegistry")
            .field("names", &self.names())
            .field("default_name", &self.default_name)
            .finish()
    }
}

impl RetryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-seeded with the built-in policies.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register a policy factory under a name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: PolicyFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.policies.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        debug!(name = %name, "registered retry policy");
        self.policies.insert(name, factory);
        Ok(())
    }

    /// Remove a registered policy.
    ///
    /// Clears the default if it pointed at the removed entry.
    pub fn unregister(&mut self, name: &str) -> Result<(), RegistryError> {
        if self.policies.remove(name).is_none() {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if self.default_name.as_deref() == Some(name) {
            debug!(name, "cleared default retry policy");
            self.default_name = None;
        }
        debug!(name, "unregistered retry policy");
        Ok(())
    }

    /// Select the default policy by name.
    pub fn set_default(&mut self, name: &str) -> Result<(), RegistryError> {
        if !self.policies.contains_key(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        debug!(name, "set default retry policy");
        self.default_name = Some(name.to_string());
        Ok(())
    }

    /// Construct a policy by name, or the default when `name` is `None`.
    pub fn get(&self, name: Option<&str>) -> Result<Box<dyn RetryPolicy>, RegistryError> {
        let name = match name {
            Some(name) => name,
            None => self.default_name.as_deref().ok_or(RegistryError::NoDefault)?,
        };
        let factory = self
            .policies
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(factory())
    }

    /// Names of all registered policies.
    pub fn names(&self) -> Vec<&str> {
        self.policies.keys().map(String::as_str).collect()
    }

    /// Name of the current default, if any.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Seed the built-in policies.
    ///
    /// Idempotent: names already present are left untouched, and the
    /// exponential-backoff default is only set when no default exists.
    pub fn register_builtins(&mut self) {
        if !self.policies.contains_key(EXPONENTIAL_BACKOFF) {
            let factory: PolicyFactory = Box::new(|| Box::new(ExponentialBackoffPolicy::new()));
            // Name is known to be absent, so this cannot fail.
            let _ = self.register(EXPONENTIAL_BACKOFF, factory);
        }
        if !self.policies.contains_key(FIXED_DELAY) {
            let factory: PolicyFactory = Box::new(|| Box::new(FixedDelayPolicy::default()));
            let _ = self.register(FIXED_DELAY, factory);
        }
        if self.default_name.is_none() {
            let _ = self.set_default(EXPONENTIAL_BACKOFF);
        }
    }
}
