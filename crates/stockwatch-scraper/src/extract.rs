//! Record extractor: pulls the embedded store array and the product title out
//! of one fetched page.
//!
//! Extraction is split into a tolerant locator ([`locate_store_array`]) and a
//! strict decoder ([`decode_store_entries`]) so the page-embedding convention
//! can change without touching the JSON handling.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::types::{PageContent, RawStoreEntry, UNKNOWN_TITLE};

/// Locale argument that follows the store array in the `storeFinder` call.
pub const LOCALE_MARKER: &str = "AU";

static STORE_FINDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"window\.storeFinder\(\s*(\[[\s\S]*?\])\s*,\s*'{}'",
        regex::escape(LOCALE_MARKER)
    ))
    .expect("valid regex")
});

/// Title and raw store records found on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub entries: Vec<RawStoreEntry>,
}

/// Find the JSON array literal passed to `window.storeFinder(..., 'AU')`.
///
/// The shortest bracketed span that is directly followed by the locale
/// argument wins. Returns `None` when the page does not use the convention.
#[must_use]
pub fn locate_store_array(page: &str) -> Option<&str> {
    STORE_FINDER_RE
        .captures(page)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Decode a located array slice into store records.
///
/// The slice must be valid JSON and an array. Elements that are not objects
/// are skipped; object fields of the wrong type decode as absent.
///
/// # Errors
///
/// Returns [`ExtractError::Decode`] when the slice is not a JSON array.
pub fn decode_store_entries(slice: &str) -> Result<Vec<RawStoreEntry>, ExtractError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(slice)?;
    Ok(values
        .into_iter()
        .filter(serde_json::Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

/// Extract the title and store records from one fetched page.
///
/// Never fails: a missing pattern or undecodable array yields no entries,
/// and a missing title element yields [`UNKNOWN_TITLE`]. Decode failures are
/// logged against `url`.
#[must_use]
pub fn extract_page(url: &str, content: &PageContent) -> ExtractedPage {
    let title = content
        .title
        .as_deref()
        .map_or_else(|| UNKNOWN_TITLE.to_string(), |t| t.trim().to_string());

    let entries = match locate_store_array(&content.body) {
        Some(slice) => match decode_store_entries(slice) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to decode embedded store data");
                Vec::new()
            }
        },
        None => {
            tracing::debug!(url, "no storeFinder data on page");
            Vec::new()
        }
    };

    ExtractedPage { title, entries }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
