//! Exclusion checks consumed by the cleanup engine.
//!
//! Each check answers "may this title be acted on?". `true` means the title
//! is actionable; `false` means a configured exclusion applies and it should
//! be skipped.

use availarr_common::{ExternalId, MediaType};
use tracing::debug;

use crate::config::JustWatchExclusions;
use crate::justwatch::AvailabilityResolver;
use crate::mdblist::AggregatedIndex;

/// Streaming availability exclusion for one library.
pub struct JustWatchExclusion<'a> {
    config: &'a JustWatchExclusions,
}

impl<'a> JustWatchExclusion<'a> {
    pub fn new(config: &'a JustWatchExclusions) -> Self {
        Self { config }
    }

    /// Returns `false` when `available_on` is set and the title streams on
    /// one of those providers, or when `not_available_on` is set and it does
    /// not.
    pub async fn is_actionable(
        &self,
        resolver: &AvailabilityResolver,
        title: &str,
        year: u16,
        media_type: MediaType,
    ) -> bool {
        if let Some(providers) = self.config.available_on.as_deref().filter(|p| !p.is_empty()) {
            if resolver.is_available_on(title, year, media_type, providers).await {
                debug!(
                    "{} is available on streaming service(s) {:?}, skipping",
                    title, providers
                );
                return false;
            }
        }

        if let Some(providers) = self
            .config
            .not_available_on
            .as_deref()
            .filter(|p| !p.is_empty())
        {
            if resolver.is_unavailable_on(title, year, media_type, providers).await {
                debug!(
                    "{} is not available on streaming service(s) {:?}, skipping",
                    title, providers
                );
                return false;
            }
        }

        true
    }
}

/// Curated list exclusion backed by an aggregated index.
pub struct ListExclusion<'a> {
    index: &'a AggregatedIndex,
}

impl<'a> ListExclusion<'a> {
    pub fn new(index: &'a AggregatedIndex) -> Self {
        Self { index }
    }

    /// Returns `false` when `external_id` appears on one of the lists.
    pub fn is_actionable(&self, external_id: ExternalId) -> bool {
        match self.index.get(external_id) {
            Some(entry) => {
                debug!(
                    external_id,
                    list = %entry.list_url,
                    "Title is on an excluded list, skipping"
                );
                false
            }
            None => true,
        }
    }
}
