//! Tiered title/year matching.
//!
//! Tiers are tried in order and the first hit wins:
//!
//! 1. [`MatchTier::Exact`] -- identical title and release year.
//! 2. [`MatchTier::CaseInsensitive`] -- lowercase-equal title, identical year.
//! 3. [`MatchTier::Tolerant`] -- lowercase-equal title, year off by at most
//!    [`YEAR_TOLERANCE`] (regional release dates often differ by a year).
//!    The nearest year wins; ties go to the earlier candidate.

use serde::Serialize;

use super::types::SearchResult;

/// Maximum release-year difference accepted by the tolerant tier.
pub const YEAR_TOLERANCE: u16 = 1;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Tolerant,
}

/// Select the best candidate for `title` released in `year`.
pub fn best_match<'a>(
    results: &'a [SearchResult],
    title: &str,
    year: u16,
) -> Option<(&'a SearchResult, MatchTier)> {
    if let Some(hit) = results
        .iter()
        .find(|r| r.title == title && r.release_year == Some(year))
    {
        return Some((hit, MatchTier::Exact));
    }

    let wanted = title.to_lowercase();
    let same_title = |r: &&SearchResult| r.title.to_lowercase() == wanted;

    if let Some(hit) = results
        .iter()
        .filter(same_title)
        .find(|r| r.release_year == Some(year))
    {
        return Some((hit, MatchTier::CaseInsensitive));
    }

    results
        .iter()
        .filter(same_title)
        .filter_map(|r| {
            let diff = r.release_year?.abs_diff(year);
            (diff <= YEAR_TOLERANCE).then_some((r, diff))
        })
        .min_by_key(|(_, diff)| *diff)
        .map(|(r, _)| (r, MatchTier::Tolerant))
}
