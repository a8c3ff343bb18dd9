//! Curated list retrieval from mdblist.
//!
//! # Module layout
//!
//! - [`list_path`] -- Parsing of `https://mdblist.com/lists/<path>` URLs.
//! - [`client`] -- Paginated, failure-tolerant item fetching.
//! - [`index`] -- Keying items by TMDB/TVDB id into an [`AggregatedIndex`].
//! - [`aggregator`] -- [`ListAggregator`], which drives the above per list.

pub mod aggregator;
pub mod client;
pub mod index;
pub mod list_path;

pub use aggregator::ListAggregator;
pub use client::{ListFetch, MdblistClient, DEFAULT_MAX_ITEMS_PER_LIST, PAGE_SIZE};
pub use index::{external_id, AggregatedIndex, ListEntry, ListFailure, ListItem};
pub use list_path::extract_list_path;
