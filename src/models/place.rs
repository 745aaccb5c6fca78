//! Geocoded places and the ranked result set.

use serde::{Deserialize, Serialize};

/// Default result page size.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Expanded page size, used once the caller asks for more results.
pub const EXPANDED_PAGE_SIZE: usize = 10;

/// One geocoded place.
///
/// Ordering within a result set is assigned by the ranking stage, not by the
/// provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Human-readable place description from the provider.
    pub display_name: String,
    /// Provider-assigned identifier (OSM id when available).
    pub source_id: String,
    /// Provider element type (`node`, `way`, `relation`).
    pub source_type: String,
    /// Great-circle distance from the caller position in kilometers.
    /// Present only when the search had a known position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// An ordered, page-capped sequence of search results.
///
/// A new search replaces any prior set wholesale; selection state into the
/// set belongs to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResultSet {
    /// Ranked results, at most `page_size` entries.
    pub results: Vec<SearchResult>,
    /// The page size the set was capped to.
    pub page_size: usize,
}

impl ResultSet {
    /// Creates a result set capped to `page_size`.
    #[must_use]
    pub fn new(mut results: Vec<SearchResult>, page_size: usize) -> Self {
        results.truncate(page_size);
        Self { results, page_size }
    }

    /// Number of results in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if no place was found at any fallback tier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates over the ranked results.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
