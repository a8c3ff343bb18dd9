//! Per-region resolver registry.
//!
//! Libraries may override the global JustWatch country and language. The
//! [`ResolverRegistry`] resolves those overrides and hands out one shared
//! [`AvailabilityResolver`] per `(country, language)` pair, so libraries in
//! the same region share a search cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use super::client::{JustWatchClient, SearchProvider};
use super::resolver::AvailabilityResolver;
use crate::config::JustWatchSettings;

type ProviderFactory = Box<dyn Fn(&str, &str) -> Arc<dyn SearchProvider> + Send + Sync>;

/// Creates and caches resolvers keyed by region.
pub struct ResolverRegistry {
    settings: JustWatchSettings,
    factory: ProviderFactory,
    resolvers: Mutex<HashMap<(String, String), Arc<AvailabilityResolver>>>,
}

impl ResolverRegistry {
    /// Create a registry whose resolvers talk to the configured JustWatch
    /// endpoint.
    pub fn new(settings: JustWatchSettings) -> Self {
        let endpoint = settings.endpoint.clone();
        let timeout = Duration::from_secs(settings.timeout_secs);
        Self::with_factory(settings, move |country, language| -> Arc<dyn SearchProvider> {
            Arc::new(JustWatchClient::with_options(
                country, language, &endpoint, timeout,
            ))
        })
    }

    /// Create a registry with a custom search backend factory.
    pub fn with_factory<F>(settings: JustWatchSettings, factory: F) -> Self
    where
        F: Fn(&str, &str) -> Arc<dyn SearchProvider> + Send + Sync + 'static,
    {
        Self {
            settings,
            factory: Box::new(factory),
            resolvers: Mutex::new(HashMap::new()),
        }
    }

    /// Get the resolver for a library, applying its optional overrides on top
    /// of the global settings.
    ///
    /// Returns `None` when neither the library nor the global settings name a
    /// country.
    pub fn resolver_for(
        &self,
        country: Option<&str>,
        language: Option<&str>,
    ) -> Option<Arc<AvailabilityResolver>> {
        let country = country
            .or(self.settings.country.as_deref())?
            .trim()
            .to_uppercase();
        let language = language
            .unwrap_or(&self.settings.language)
            .trim()
            .to_lowercase();

        let mut resolvers = self.resolvers.lock();
        let resolver = resolvers
            .entry((country.clone(), language.clone()))
            .or_insert_with(|| {
                debug!(country = %country, language = %language, "Creating resolver");
                Arc::new(AvailabilityResolver::new((self.factory)(&country, &language)))
            });
        Some(Arc::clone(resolver))
    }

    /// Number of distinct regions with a resolver.
    pub fn len(&self) -> usize {
        self.resolvers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.lock().is_empty()
    }
}
