//! Availarr - streaming availability and curated list lookups
//!
//! This library crate exposes the media resolution layer used by the cleanup
//! engine:
//!
//! - [`justwatch`] -- find a title on JustWatch and check its streaming offers.
//! - [`mdblist`] -- fetch curated mdblist lists and index them by TMDB/TVDB id.
//! - [`exclusion`] -- the exclusion checks built on top of both.
//!
//! The two lookup components are independent of each other.

pub mod config;
pub mod exclusion;
pub mod justwatch;
pub mod mdblist;
