//! JustWatch GraphQL search transport.
//!
//! Implements [`SearchProvider`] by posting a `GetSearchTitles` query to the
//! JustWatch GraphQL endpoint.
//!
//! Features:
//! - Browser-like `User-Agent` on every request (default clients get throttled).
//! - 30-second request timeout.
//! - Offer technical names normalised from either upstream offer layout.
//!
//! There are no retries: a failed request is reported once and the caller
//! decides what to do with it.

use std::time::Duration;

use async_trait::async_trait;
use availarr_common::{Error, Result};
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::types::{Offer, SearchResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const JUSTWATCH_GRAPHQL_URL: &str = "https://apis.justwatch.com/graphql";
const JUSTWATCH_SITE_URL: &str = "https://www.justwatch.com";
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SEARCH_QUERY: &str = r#"
query GetSearchTitles(
  $searchTitlesFilter: TitleFilter!,
  $country: Country!,
  $language: Language!,
  $first: Int!,
  $filter: OfferFilter!
) {
  popularTitles(
    country: $country
    filter: $searchTitlesFilter
    first: $first
    sortBy: POPULAR
    sortRandomSeed: 0
  ) {
    edges {
      node {
        id
        objectType
        content(country: $country, language: $language) {
          title
          fullPath
          originalReleaseYear
          externalIds {
            imdbId
          }
        }
        offers(country: $country, platform: WEB, filter: $filter) {
          monetizationType
          package {
            clearName
            technicalName
          }
        }
      }
    }
  }
}
"#;

// ---------------------------------------------------------------------------
// Search seam
// ---------------------------------------------------------------------------

/// Async trait for anything that can run a remote title search.
///
/// The resolver only depends on this trait, so tests and alternative
/// backends can stand in for the real JustWatch endpoint.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"justwatch"`).
    fn name(&self) -> &'static str;

    /// Search for `title`, returning at most `max_results` candidates.
    ///
    /// `best_only` asks the upstream to collapse offers to the best one per
    /// service.
    async fn search(
        &self,
        title: &str,
        max_results: usize,
        best_only: bool,
    ) -> Result<Vec<SearchResult>>;
}

// ---------------------------------------------------------------------------
// GraphQL response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<SearchData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchData {
    popular_titles: Option<TitleConnection>,
}

#[derive(Debug, Deserialize)]
struct TitleConnection {
    #[serde(default)]
    edges: Vec<TitleEdge>,
}

#[derive(Debug, Deserialize)]
struct TitleEdge {
    node: TitleNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitleNode {
    id: Option<String>,
    object_type: Option<String>,
    content: Option<TitleContent>,
    #[serde(default)]
    offers: Option<Vec<RawOffer>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitleContent {
    title: Option<String>,
    full_path: Option<String>,
    original_release_year: Option<u16>,
    external_ids: Option<RawExternalIds>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExternalIds {
    imdb_id: Option<String>,
}

/// An offer in either upstream layout: the technical name nested under
/// `package`, or carried on the offer itself.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOffer {
    package: Option<RawPackage>,
    #[serde(alias = "technical_name")]
    technical_name: Option<String>,
    #[serde(alias = "clear_name")]
    clear_name: Option<String>,
    #[serde(alias = "monetization_type")]
    monetization_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPackage {
    #[serde(alias = "technical_name")]
    technical_name: Option<String>,
    #[serde(alias = "clear_name")]
    clear_name: Option<String>,
}

impl From<RawOffer> for Offer {
    fn from(raw: RawOffer) -> Self {
        let nested = raw.package.as_ref().and_then(|p| p.technical_name.as_deref());
        let mut offer = Offer::from_candidates(nested, raw.technical_name.as_deref());
        offer.provider_name = raw
            .package
            .and_then(|p| p.clear_name)
            .or(raw.clear_name);
        offer.monetization_type = raw.monetization_type;
        offer
    }
}

impl From<TitleNode> for SearchResult {
    fn from(node: TitleNode) -> Self {
        let content = node.content;
        let (title, release_year, url, imdb_id) = match content {
            Some(c) => (
                c.title.unwrap_or_default(),
                c.original_release_year,
                c.full_path.map(|p| format!("{JUSTWATCH_SITE_URL}{p}")),
                c.external_ids.and_then(|ids| ids.imdb_id),
            ),
            None => (String::new(), None, None, None),
        };

        SearchResult {
            title,
            release_year,
            offers: node
                .offers
                .unwrap_or_default()
                .into_iter()
                .map(Offer::from)
                .collect(),
            entry_id: node.id,
            object_type: node.object_type,
            url,
            imdb_id,
        }
    }
}

/// Decode a GraphQL search response body into normalized results.
pub(crate) fn parse_search_response(body: &str) -> Result<Vec<SearchResult>> {
    let response: GraphQlResponse = serde_json::from_str(body)?;

    // Partial data next to errors is still a failed search
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(Error::http(format!("GraphQL errors: {}", messages.join("; "))));
    }

    let data = response
        .data
        .ok_or_else(|| Error::unexpected_shape("response has no data"))?;

    let connection = data
        .popular_titles
        .ok_or_else(|| Error::unexpected_shape("response has no popularTitles"))?;

    Ok(connection
        .edges
        .into_iter()
        .map(|edge| SearchResult::from(edge.node))
        .collect())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// JustWatch search client bound to one country and language.
///
/// # Examples
///
/// ```no_run
/// use availarr::justwatch::JustWatchClient;
///
/// let client = JustWatchClient::new("US", "en");
/// ```
pub struct JustWatchClient {
    client: reqwest::Client,
    endpoint: String,
    country: String,
    language: String,
}

impl JustWatchClient {
    /// Create a client for the given ISO country and language codes.
    ///
    /// Country codes are sent uppercase and language codes lowercase.
    pub fn new(country: &str, language: &str) -> Self {
        Self::with_options(country, language, JUSTWATCH_GRAPHQL_URL, REQUEST_TIMEOUT)
    }

    /// Create a client against a custom endpoint (a caching proxy or a test
    /// server) with a custom timeout.
    pub fn with_options(country: &str, language: &str, endpoint: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            endpoint: endpoint.to_string(),
            country: country.trim().to_uppercase(),
            language: language.trim().to_lowercase(),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn request_body(&self, title: &str, max_results: usize, best_only: bool) -> serde_json::Value {
        json!({
            "operationName": "GetSearchTitles",
            "variables": {
                "first": max_results,
                "searchTitlesFilter": { "searchQuery": title },
                "language": self.language,
                "country": self.country,
                "filter": { "bestOnly": best_only },
            },
            "query": SEARCH_QUERY,
        })
    }
}

#[async_trait]
impl SearchProvider for JustWatchClient {
    fn name(&self) -> &'static str {
        "justwatch"
    }

    async fn search(
        &self,
        title: &str,
        max_results: usize,
        best_only: bool,
    ) -> Result<Vec<SearchResult>> {
        debug!(
            title = %title,
            country = %self.country,
            language = %self.language,
            max_results,
            best_only,
            "JustWatch search"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .json(&self.request_body(title, max_results, best_only))
            .send()
            .await
            .map_err(|e| Error::http(format!("JustWatch request failed: {e}")))?;

        let response = response
            .error_for_status()
            .map_err(|e| Error::http(format!("JustWatch request returned error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("JustWatch response read failed: {e}")))?;

        parse_search_response(&body)
    }
}
