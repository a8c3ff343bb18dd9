//! Normalized search result types.
//!
//! Upstream responses are decoded into private wire structs inside
//! [`client`](super::client) and converted once into the values below, so
//! callers never deal with the differing upstream offer layouts.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// One candidate returned by a title search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display title as reported upstream.
    pub title: String,
    /// Original release year, if known.
    pub release_year: Option<u16>,
    /// Streaming placements for the configured country, in upstream order.
    pub offers: Vec<Offer>,
    /// Upstream entry identifier (e.g. `"tm1234"`).
    pub entry_id: Option<String>,
    /// Upstream object type (`"MOVIE"` / `"SHOW"`).
    pub object_type: Option<String>,
    /// Absolute URL of the title page.
    pub url: Option<String>,
    /// IMDb id, when the upstream knows it.
    pub imdb_id: Option<String>,
}

impl SearchResult {
    /// Convenience constructor for a result with only the matching fields set.
    pub fn new(title: impl Into<String>, release_year: Option<u16>, offers: Vec<Offer>) -> Self {
        Self {
            title: title.into(),
            release_year,
            offers,
            entry_id: None,
            object_type: None,
            url: None,
            imdb_id: None,
        }
    }

    /// Returns `true` when at least one offer exists.
    pub fn has_offers(&self) -> bool {
        !self.offers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

/// One streaming placement for a [`SearchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Lowercase machine identifier of the streaming service (e.g. `netflix`).
    /// Empty when the upstream offered neither name location.
    pub provider_technical_name: String,
    /// Human readable service name (e.g. `Netflix`).
    pub provider_name: Option<String>,
    /// Monetization model (`FLATRATE`, `RENT`, `BUY`, `FREE`, `ADS`).
    pub monetization_type: Option<String>,
}

impl Offer {
    /// Build an offer for the given technical name, normalising it.
    pub fn new(technical_name: &str) -> Self {
        Self {
            provider_technical_name: normalize_name(technical_name),
            provider_name: None,
            monetization_type: None,
        }
    }

    /// Build an offer from both possible upstream name locations.
    ///
    /// The name nested under the offer's `package` is preferred; the name
    /// carried directly on the offer is used otherwise. The first non-empty
    /// candidate wins and is lowercased.
    pub fn from_candidates(nested: Option<&str>, direct: Option<&str>) -> Self {
        let technical_name = [nested, direct]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
            .map(normalize_name)
            .unwrap_or_default();

        Self {
            provider_technical_name: technical_name,
            provider_name: None,
            monetization_type: None,
        }
    }

    /// Returns `true` when the offer carries a technical name.
    pub fn has_provider(&self) -> bool {
        !self.provider_technical_name.is_empty()
    }
}

/// Lowercase and trim a provider identifier.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
