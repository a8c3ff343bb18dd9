//! Multi-list aggregation.

use availarr_common::{Error, MediaType, Result};
use tracing::{error, info};

use super::client::MdblistClient;
use super::index::AggregatedIndex;
use super::list_path::extract_list_path;
use crate::config::ListConfig;

/// Fetches every configured list and merges the items into one index.
///
/// Lists are processed sequentially in configuration order; duplicate URLs
/// are fetched again.
pub struct ListAggregator {
    client: MdblistClient,
}

impl ListAggregator {
    pub fn new(client: MdblistClient) -> Self {
        Self { client }
    }

    /// Aggregate all lists for a media type given by name.
    ///
    /// Any media type other than `movie` or `show` is a configuration error
    /// and is returned immediately, before any request is made.
    pub async fn collect_all(&self, media_type: &str, config: &ListConfig) -> Result<AggregatedIndex> {
        let media_type: MediaType = media_type.parse()?;
        Ok(self.collect(media_type, config).await)
    }

    /// Aggregate all lists for `media_type`.
    ///
    /// Unparseable URLs and failed fetches are logged and recorded in
    /// [`AggregatedIndex::failures`]; items fetched before a failure are still
    /// merged.
    pub async fn collect(&self, media_type: MediaType, config: &ListConfig) -> AggregatedIndex {
        let mut index = AggregatedIndex::new();

        for url in &config.lists {
            let Some(list_path) = extract_list_path(url) else {
                error!(url = %url, "Could not extract list path from URL");
                index.record_failure(url, Error::InvalidListUrl(url.clone()));
                continue;
            };

            let fetch = self
                .client
                .fetch_list_items(&list_path, media_type, config.max_items_per_list)
                .await;

            let fetched = fetch.items.len();
            let indexed = index.merge(fetch.items, url, media_type);
            info!(
                list = %list_path,
                %media_type,
                fetched,
                indexed,
                requests = fetch.requests,
                complete = fetch.error.is_none(),
                "Indexed mdblist list"
            );

            if let Some(e) = fetch.error {
                index.record_failure(url, e);
            }
        }

        index
    }
}
