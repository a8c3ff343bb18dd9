//! Availarr-Common: Shared types and errors.
//!
//! This crate provides functionality used across availarr:
//!
//! - **Media types**: the `movie` / `show` distinction and its external id source
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use availarr_common::{Error, MediaType, Result};
//!
//! let media_type: MediaType = "show".parse().unwrap();
//! assert_eq!(media_type.list_key(), "shows");
//!
//! fn example() -> Result<MediaType> {
//!     "anime".parse()
//! }
//! assert!(matches!(example(), Err(Error::InvalidMediaType(_))));
//! ```

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
