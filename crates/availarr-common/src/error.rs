//! Common error types used throughout availarr.
//!
//! Most runtime failures (network, malformed payloads) are absorbed by the
//! resolver and aggregator and only logged. The variants here exist so the
//! transport layers can describe what went wrong before degrading, and so the
//! few genuinely fatal conditions can reach the caller.

/// Common error type for availarr.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A media type outside `movie` / `show` was requested.
    #[error("Invalid media type '{0}'. Expected 'movie' or 'show'")]
    InvalidMediaType(String),

    /// A list URL does not reference an mdblist list.
    #[error("Invalid list URL: {0}")]
    InvalidListUrl(String),

    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// An upstream payload did not have the expected structure.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// JSON decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new Http error.
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Self::Http(msg.into())
    }

    /// Create a new UnexpectedShape error.
    pub fn unexpected_shape<S: Into<String>>(msg: S) -> Self {
        Self::UnexpectedShape(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
