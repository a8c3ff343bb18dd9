//! In-memory search result cache.
//!
//! Entries live for the lifetime of the owning resolver and are only dropped
//! by [`SearchCache::clear`]. Failed searches are never stored.
//!
//! The map sits behind a [`parking_lot::Mutex`] that is never held across an
//! `.await`, so the cache can be shared between tasks. Two concurrent misses
//! on the same key both reach the network; the later insert wins.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::types::SearchResult;

/// Composite cache key for a search call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub title: String,
    pub max_results: usize,
    pub best_only: bool,
}

impl SearchKey {
    pub fn new(title: &str, max_results: usize, best_only: bool) -> Self {
        Self {
            title: title.to_string(),
            max_results,
            best_only,
        }
    }
}

/// Thread-safe cache of successful search results.
#[derive(Default)]
pub struct SearchCache {
    entries: Mutex<HashMap<SearchKey, Arc<Vec<SearchResult>>>>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached results for `key`, if any.
    pub fn get(&self, key: &SearchKey) -> Option<Arc<Vec<SearchResult>>> {
        self.entries.lock().get(key).cloned()
    }

    /// Store results for `key`, returning the shared handle.
    pub fn insert(&self, key: SearchKey, results: Vec<SearchResult>) -> Arc<Vec<SearchResult>> {
        let results = Arc::new(results);
        self.entries.lock().insert(key, Arc::clone(&results));
        results
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
