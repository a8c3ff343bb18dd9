//! Streaming availability lookups backed by JustWatch.
//!
//! # Module layout
//!
//! - [`types`] -- Normalized [`SearchResult`] and [`Offer`] values.
//! - [`client`] -- The [`SearchProvider`] seam and the GraphQL transport.
//! - [`cache`] -- Process-lifetime search result cache.
//! - [`matcher`] -- Tiered title/year matching.
//! - [`resolver`] -- [`AvailabilityResolver`], the entry point for callers.
//! - [`registry`] -- One shared resolver per country/language pair.

pub mod cache;
pub mod client;
pub mod matcher;
pub mod registry;
pub mod resolver;
pub mod types;

pub use cache::{SearchCache, SearchKey};
pub use client::{JustWatchClient, SearchProvider};
pub use matcher::{best_match, MatchTier};
pub use registry::ResolverRegistry;
pub use resolver::{AvailabilityResolver, ANY_PROVIDER, DEFAULT_MAX_RESULTS};
pub use types::{Offer, SearchResult};
