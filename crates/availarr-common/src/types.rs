//! Core type definitions shared by the resolver and list layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Kind of media a lookup is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// A single movie, keyed by its TMDB id.
    Movie,
    /// A TV series, keyed by its TVDB id.
    Show,
}

impl MediaType {
    /// Key used by mdblist responses that group items by media type.
    pub fn list_key(&self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Show => "shows",
        }
    }

    /// Name of the external id source used to index list items.
    pub fn id_source(&self) -> &'static str {
        match self {
            Self::Movie => "tmdb",
            Self::Show => "tvdb",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Show => write!(f, "show"),
        }
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "show" => Ok(Self::Show),
            other => Err(Error::InvalidMediaType(other.to_string())),
        }
    }
}

/// Numeric identifier from an external catalogue (TMDB for movies, TVDB for
/// shows).
pub type ExternalId = i64;
