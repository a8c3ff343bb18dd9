//! Mdblist list URL parsing.

use std::sync::LazyLock;

use regex::Regex;

static LIST_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://mdblist\.com/lists/(?P<path>[^?#]+)").unwrap());

/// Extract the list path from an mdblist list URL.
///
/// Query strings, fragments and trailing slashes are dropped. Any other host,
/// or a URL without a path after `/lists/`, yields `None`.
///
/// ```
/// use availarr::mdblist::extract_list_path;
///
/// assert_eq!(
///     extract_list_path("https://mdblist.com/lists/alice/favs/").as_deref(),
///     Some("alice/favs")
/// );
/// assert_eq!(extract_list_path("https://example.com/lists/x"), None);
/// ```
pub fn extract_list_path(url: &str) -> Option<String> {
    let captures = LIST_URL_PATTERN.captures(url.trim())?;
    let path = captures.name("path")?.as_str().trim_end_matches('/');
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}
