use availarr_common::MediaType;
use serde::{Deserialize, Serialize};

use crate::justwatch::client::JUSTWATCH_GRAPHQL_URL;
use crate::mdblist::client::{DEFAULT_MAX_ITEMS_PER_LIST, MDBLIST_BASE_URL};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub justwatch: JustWatchSettings,

    #[serde(default)]
    pub mdblist: Option<MdblistSettings>,

    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,
}

impl Config {
    /// Look up a library by name.
    pub fn library(&self, name: &str) -> Option<&LibraryConfig> {
        self.libraries.iter().find(|l| l.name == name)
    }
}

/// Global JustWatch settings for streaming availability lookups.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JustWatchSettings {
    /// ISO 3166-1 alpha-2 country code (e.g. US, GB, DE)
    #[serde(default)]
    pub country: Option<String>,

    /// Language code for API responses
    #[serde(default = "default_language")]
    pub language: String,

    /// GraphQL endpoint; point this at a caching proxy if needed
    #[serde(default = "default_justwatch_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_language() -> String {
    "en".to_string()
}
fn default_justwatch_endpoint() -> String {
    JUSTWATCH_GRAPHQL_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for JustWatchSettings {
    fn default() -> Self {
        Self {
            country: None,
            language: default_language(),
            endpoint: default_justwatch_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MdblistSettings {
    pub api_key: String,

    #[serde(default = "default_mdblist_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub ssl_verify: bool,
}

fn default_mdblist_base_url() -> String {
    MDBLIST_BASE_URL.to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    pub name: String,

    pub media_type: MediaType,

    #[serde(default)]
    pub exclude: ExclusionConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExclusionConfig {
    #[serde(default)]
    pub justwatch: Option<JustWatchExclusions>,

    #[serde(default)]
    pub mdblist: Option<ListConfig>,
}

/// Streaming availability exclusions for one library.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JustWatchExclusions {
    /// Override the global country for this library
    #[serde(default)]
    pub country: Option<String>,

    /// Override the global language for this library
    #[serde(default)]
    pub language: Option<String>,

    /// Exclude media available on these providers (`["any"]` for any service)
    #[serde(default)]
    pub available_on: Option<Vec<String>>,

    /// Exclude media NOT available on these providers
    #[serde(default)]
    pub not_available_on: Option<Vec<String>>,
}

/// Curated lists whose members are excluded from cleanup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListConfig {
    #[serde(default)]
    pub lists: Vec<String>,

    #[serde(default = "default_max_items_per_list")]
    pub max_items_per_list: usize,
}

fn default_max_items_per_list() -> usize {
    DEFAULT_MAX_ITEMS_PER_LIST
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            max_items_per_list: default_max_items_per_list(),
        }
    }
}
