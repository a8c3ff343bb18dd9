//! Mdblist list items API client.
//!
//! Pages through `GET {base_url}/lists/{list_path}/items/` until the list is
//! exhausted or the per-list cap is reached. Failures never propagate: the
//! items gathered so far are returned together with the error that stopped
//! the walk.

use std::time::Duration;

use availarr_common::{Error, MediaType, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

/// Default mdblist API base URL.
pub const MDBLIST_BASE_URL: &str = "https://api.mdblist.com";
/// Items requested per page.
pub const PAGE_SIZE: usize = 1000;
/// Default cap on items taken from one list.
pub const DEFAULT_MAX_ITEMS_PER_LIST: usize = 1000;
/// Connection timeout for mdblist API requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const HAS_MORE_HEADER: &str = "x-has-more";

/// Items gathered from one list, plus the error that cut the walk short.
#[derive(Debug, Default)]
pub struct ListFetch {
    /// Raw item records in list order, at most the requested cap.
    pub items: Vec<Value>,
    /// Why pagination stopped early, if it did.
    pub error: Option<Error>,
    /// Number of page requests issued.
    pub requests: usize,
}

impl ListFetch {
    /// Returns `true` when pagination ended normally.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// One decoded page.
struct Page {
    items: Vec<Value>,
    has_more: bool,
}

pub struct MdblistClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MdblistClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_options(api_key, MDBLIST_BASE_URL, REQUEST_TIMEOUT, true)
    }

    pub fn with_options(api_key: &str, base_url: &str, timeout: Duration, ssl_verify: bool) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!ssl_verify)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, list_path: &str) -> String {
        format!("{}/lists/{}/items/", self.base_url, list_path)
    }

    /// Fetch up to `max_items` items from the list at `list_path`.
    ///
    /// Stops when the cap is reached, a page comes back empty, or the
    /// `X-Has-More` header is absent or not `true`. The result is truncated
    /// to `max_items` even if the last page overshoots.
    pub async fn fetch_list_items(
        &self,
        list_path: &str,
        media_type: MediaType,
        max_items: usize,
    ) -> ListFetch {
        let mut fetch = ListFetch::default();
        let mut offset = 0usize;

        while fetch.items.len() < max_items {
            fetch.requests += 1;
            match self.fetch_page(list_path, media_type, offset).await {
                Ok(page) => {
                    debug!(
                        list = %list_path,
                        offset,
                        count = page.items.len(),
                        has_more = page.has_more,
                        "Fetched mdblist page"
                    );
                    if page.items.is_empty() {
                        break;
                    }
                    fetch.items.extend(page.items);
                    offset += PAGE_SIZE;
                    if !page.has_more {
                        break;
                    }
                }
                Err(e @ Error::UnexpectedShape(_)) => {
                    warn!(list = %list_path, offset, "Unexpected mdblist response: {}", e);
                    fetch.error = Some(e);
                    break;
                }
                Err(e) => {
                    error!(list = %list_path, "Failed to fetch mdblist items");
                    debug!(list = %list_path, offset, "Error: {}", e);
                    fetch.error = Some(e);
                    break;
                }
            }
        }

        fetch.items.truncate(max_items);
        fetch
    }

    async fn fetch_page(&self, list_path: &str, media_type: MediaType, offset: usize) -> Result<Page> {
        let limit = PAGE_SIZE.to_string();
        let offset = offset.to_string();

        let response = self
            .client
            .get(self.url(list_path))
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::http(format!("mdblist request failed: {}", e.without_url())))?;

        let response = response
            .error_for_status()
            .map_err(|e| Error::http(format!("mdblist returned error: {}", e.without_url())))?;

        let has_more = response
            .headers()
            .get(HAS_MORE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::http(format!("mdblist response read failed: {}", e.without_url())))?;
        let body: Value = serde_json::from_slice(&body)?;

        Ok(Page {
            items: page_items(body, media_type)?,
            has_more,
        })
    }
}

/// Pull the item array out of a page body.
///
/// The API answers either with a bare array or with an object grouping items
/// under `movies` / `shows`.
fn page_items(body: Value, media_type: MediaType) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut groups) => match groups.remove(media_type.list_key()) {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(Error::unexpected_shape(format!(
                "'{}' is {}, expected an array",
                media_type.list_key(),
                json_kind(&other)
            ))),
        },
        other => Err(Error::unexpected_shape(format!(
            "body is {}, expected an object or array",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_page() {
        let items = page_items(json!([{"id": 1}, {"id": 2}]), MediaType::Movie).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn grouped_page_picks_media_type() {
        let body = json!({
            "movies": [{"id": 1}],
            "shows": [{"tvdb_id": 2}, {"tvdb_id": 3}]
        });
        assert_eq!(page_items(body.clone(), MediaType::Movie).unwrap().len(), 1);
        assert_eq!(page_items(body, MediaType::Show).unwrap().len(), 2);
    }

    #[test]
    fn grouped_page_without_key_is_empty() {
        let items = page_items(json!({"shows": [{"tvdb_id": 2}]}), MediaType::Movie).unwrap();
        assert!(items.is_empty());
        let items = page_items(json!({"movies": null}), MediaType::Movie).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn unexpected_shapes() {
        assert!(matches!(
            page_items(json!("nope"), MediaType::Movie),
            Err(Error::UnexpectedShape(_))
        ));
        assert!(matches!(
            page_items(json!({"movies": {"id": 1}}), MediaType::Movie),
            Err(Error::UnexpectedShape(_))
        ));
        assert!(matches!(
            page_items(json!(42), MediaType::Show),
            Err(Error::UnexpectedShape(_))
        ));
    }

    #[test]
    fn url_construction() {
        let client = MdblistClient::with_options("key", "http://localhost:1234/", REQUEST_TIMEOUT, true);
        assert_eq!(
            client.url("alice/favs"),
            "http://localhost:1234/lists/alice/favs/items/"
        );
    }

    #[test]
    fn list_fetch_completion() {
        let mut fetch = ListFetch::default();
        assert!(fetch.is_complete());
        fetch.error = Some(Error::http("boom"));
        assert!(!fetch.is_complete());
    }
}
