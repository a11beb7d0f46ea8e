use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::bracket_source::{BracketSource, SourceError};

/// Backend-agnostic bracket source configuration.
///
/// `backend` must match the [`SourceFactory::backend_name`] of a
/// registered factory.  `location` is passed through to that factory
/// unchanged; its meaning is entirely backend-specific.
///
/// | backend | location examples                     |
/// |---------|---------------------------------------|
/// | `http`  | `http://localhost:5001`               |
/// | `csv`   | `schedules/tax_brackets.csv`          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub location: String,
    /// Upper bound on a single fetch, for backends that do I/O per call.
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            location: "http://localhost:5001".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// One implementation per bracket backend.  Each backend crate exports a
/// single unit struct that implements this trait and is registered with a
/// [`SourceRegistry`] at startup.
#[async_trait]
pub trait SourceFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use source. Implementations may load data or
    /// construct clients inside this method.
    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketSource>, SourceError>;
}

/// Registry of [`SourceFactory`] instances, keyed by backend name.
pub struct SourceRegistry {
    factories: HashMap<&'static str, Box<dyn SourceFactory>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any factory with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn SourceFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`SourceError::Configuration`] when no factory is registered for
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketSource>, SourceError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                SourceError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
