//! Aggregated list index keyed by external id.
//!
//! Movies are keyed by TMDB id (`id`, falling back to `ids.tmdb`), shows by
//! TVDB id (`tvdb_id`, falling back to `ids.tvdb`). Items without a usable
//! id are skipped. A later list overwrites an earlier entry with the same id.

use std::collections::HashMap;

use availarr_common::{Error, ExternalId, MediaType};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One list entry resolved to its external id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub external_id: ExternalId,
    /// The unmodified source record.
    pub raw_payload: Value,
    pub source_list_url: String,
}

/// Value stored in the index for an external id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    /// The unmodified source record.
    pub payload: Value,
    /// URL of the list the record came from.
    pub list_url: String,
}

/// A list URL that was skipped or only partially fetched.
#[derive(Debug)]
pub struct ListFailure {
    pub list_url: String,
    pub error: Error,
}

/// Why an item could not be keyed.
#[derive(Debug, PartialEq)]
enum IdProblem {
    Missing,
    Unparseable(String),
}

/// Resolve the external id of a raw list item for `media_type`.
pub fn external_id(item: &Value, media_type: MediaType) -> Option<ExternalId> {
    resolve_id(item, media_type).ok()
}

fn resolve_id(item: &Value, media_type: MediaType) -> Result<ExternalId, IdProblem> {
    let (direct, nested) = match media_type {
        MediaType::Movie => ("id", "tmdb"),
        MediaType::Show => ("tvdb_id", "tvdb"),
    };

    let raw = present(item.get(direct))
        .or_else(|| present(item.get("ids").and_then(|ids| ids.get(nested))))
        .ok_or(IdProblem::Missing)?;

    parse_id(raw).ok_or_else(|| IdProblem::Unparseable(raw.to_string()))
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn parse_id(value: &Value) -> Option<ExternalId> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Merged mapping from external id to the list entry that last claimed it.
#[derive(Debug, Default)]
pub struct AggregatedIndex {
    entries: HashMap<ExternalId, ListEntry>,
    failures: Vec<ListFailure>,
}

impl AggregatedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one keyed item, returning the entry it replaced.
    pub fn insert(&mut self, item: ListItem) -> Option<ListEntry> {
        self.entries.insert(
            item.external_id,
            ListEntry {
                payload: item.raw_payload,
                list_url: item.source_list_url,
            },
        )
    }

    /// Key and insert every item fetched from `list_url`.
    ///
    /// Returns the number of items indexed. Items without a usable id are
    /// logged at debug level and dropped.
    pub fn merge(&mut self, items: Vec<Value>, list_url: &str, media_type: MediaType) -> usize {
        let mut indexed = 0;
        for item in items {
            match resolve_id(&item, media_type) {
                Ok(external_id) => {
                    self.insert(ListItem {
                        external_id,
                        raw_payload: item,
                        source_list_url: list_url.to_string(),
                    });
                    indexed += 1;
                }
                Err(problem) => {
                    let title = item.get("title").and_then(Value::as_str).unwrap_or("unknown");
                    debug!(
                        title,
                        list = %list_url,
                        id_source = media_type.id_source(),
                        ?problem,
                        "Could not get ID for mdblist item"
                    );
                }
            }
        }
        indexed
    }

    /// Record a list that was skipped or cut short.
    pub fn record_failure(&mut self, list_url: &str, error: Error) {
        self.failures.push(ListFailure {
            list_url: list_url.to_string(),
            error,
        });
    }

    pub fn get(&self, id: ExternalId) -> Option<&ListEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: ExternalId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExternalId, &ListEntry)> {
        self.entries.iter()
    }

    /// Lists that were skipped or only partially fetched.
    pub fn failures(&self) -> &[ListFailure] {
        &self.failures
    }

    /// Returns `true` when every list was fetched without error.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
