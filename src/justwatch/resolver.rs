//! Streaming availability resolver.
//!
//! [`AvailabilityResolver`] combines a [`SearchProvider`], the
//! [`SearchCache`] and the tiered [`matcher`](super::matcher) into the
//! questions the cleanup engine asks: "which title is this?" and "is it
//! streaming on any of these services?".
//!
//! The resolver never returns an error. Upstream failures are logged and
//! treated as "no results", so an unknown title reads the same as one that
//! is confirmed not to be streaming.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use availarr_common::MediaType;
use tracing::{debug, warn};

use super::cache::{SearchCache, SearchKey};
use super::client::{JustWatchClient, SearchProvider};
use super::matcher::best_match;
use super::types::{normalize_name, SearchResult};

/// Number of candidates requested when matching a title.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Provider sentinel meaning "any streaming service".
pub const ANY_PROVIDER: &str = "any";

/// Resolves titles to search results and checks their streaming offers.
pub struct AvailabilityResolver {
    provider: Arc<dyn SearchProvider>,
    cache: SearchCache,
}

impl AvailabilityResolver {
    /// Create a resolver on top of any search backend.
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            cache: SearchCache::new(),
        }
    }

    /// Create a resolver that queries JustWatch for the given region.
    pub fn justwatch(country: &str, language: &str) -> Self {
        debug!(country, language, "Creating JustWatch resolver");
        Self::new(Arc::new(JustWatchClient::new(country, language)))
    }

    /// Search for `title`, serving repeated calls from the cache.
    ///
    /// Failures are logged at warning level and yield an empty result that is
    /// *not* cached, so a later call retries.
    pub async fn search(
        &self,
        title: &str,
        max_results: usize,
        best_only: bool,
    ) -> Arc<Vec<SearchResult>> {
        let key = SearchKey::new(title, max_results, best_only);
        if let Some(hit) = self.cache.get(&key) {
            debug!(title = %title, "Search cache hit");
            return hit;
        }

        match self.provider.search(title, max_results, best_only).await {
            Ok(results) => {
                debug!(
                    title = %title,
                    provider = self.provider.name(),
                    count = results.len(),
                    "Search completed"
                );
                self.cache.insert(key, results)
            }
            Err(e) => {
                warn!(
                    title = %title,
                    provider = self.provider.name(),
                    "Search failed: {}",
                    e
                );
                Arc::new(Vec::new())
            }
        }
    }

    /// Find the single candidate matching `title` and `year`.
    ///
    /// `media_type` is part of the caller contract but does not filter
    /// candidates.
    pub async fn match_title_and_year(
        &self,
        title: &str,
        year: u16,
        media_type: MediaType,
    ) -> Option<SearchResult> {
        let results = self.search(title, DEFAULT_MAX_RESULTS, false).await;
        match best_match(&results, title, year) {
            Some((hit, tier)) => {
                debug!(
                    title = %title,
                    year,
                    %media_type,
                    matched_title = %hit.title,
                    matched_year = ?hit.release_year,
                    ?tier,
                    "Matched search result"
                );
                Some(hit.clone())
            }
            None => {
                debug!(title = %title, year, %media_type, "No matching search result");
                None
            }
        }
    }

    /// Returns `true` when the matched title has an offer on one of
    /// `providers`.
    ///
    /// Provider names are compared case-insensitively. Including `"any"`
    /// accepts any offer at all.
    pub async fn is_available_on<S: AsRef<str>>(
        &self,
        title: &str,
        year: u16,
        media_type: MediaType,
        providers: &[S],
    ) -> bool {
        let Some(result) = self.match_title_and_year(title, year, media_type).await else {
            debug!(title = %title, "No results found");
            return false;
        };

        if !result.has_offers() {
            debug!(title = %title, "Matched title has no offers");
            return false;
        }

        let wanted: HashSet<String> = providers
            .iter()
            .map(|p| normalize_name(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();

        if wanted.contains(ANY_PROVIDER) {
            debug!(title = %title, "Available on any provider");
            return true;
        }

        match result
            .offers
            .iter()
            .find(|offer| wanted.contains(&offer.provider_technical_name))
        {
            Some(offer) => {
                debug!(
                    title = %title,
                    provider = %offer.provider_technical_name,
                    "Available on provider"
                );
                true
            }
            None => false,
        }
    }

    /// Negation of [`is_available_on`](Self::is_available_on).
    pub async fn is_unavailable_on<S: AsRef<str>>(
        &self,
        title: &str,
        year: u16,
        media_type: MediaType,
        providers: &[S],
    ) -> bool {
        !self
            .is_available_on(title, year, media_type, providers)
            .await
    }

    /// Collect the technical names offered for a set of sample titles.
    ///
    /// Useful for discovering the provider identifiers valid in a region.
    pub async fn gather_providers(
        &self,
        samples: &[(String, u16)],
        media_type: MediaType,
    ) -> BTreeSet<String> {
        let mut providers = BTreeSet::new();
        for (title, year) in samples {
            if let Some(result) = self.match_title_and_year(title, *year, media_type).await {
                providers.extend(
                    result
                        .offers
                        .into_iter()
                        .filter(|o| o.has_provider())
                        .map(|o| o.provider_technical_name),
                );
            }
        }
        providers
    }

    /// Drop every cached search result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached searches.
    pub fn cached_searches(&self) -> usize {
        self.cache.len()
    }
}
