//! # Wayfind
//!
//! Natural-language place search for map front ends.
//!
//! Wayfind takes a free-text query ("cafes with outdoor seating nearby") and
//! an optional caller position, asks an LLM for a structured interpretation,
//! verifies any suggested OSM tags against the taginfo registry, synthesizes
//! a geocoding query, resolves it against Nominatim with a layered fallback
//! ladder, and returns a distance-ranked result set.
//!
//! ## Pipeline
//!
//! 1. Intent resolution (LLM, schema-validated, total fallback)
//! 2. Query synthesis (pure, deterministic)
//! 3. Geocode resolution (three-tier fallback ladder)
//! 4. Distance ranking (haversine, truncate after sort)
//!
//! ## Example
//!
//! ```rust,ignore
//! use wayfind::{SearchRequest, SearchService, UserPosition};
//!
//! let service = SearchService::new(llm, tags, geocoder, config.search);
//! let results = service.search(&SearchRequest {
//!     query: "Italian restaurants near me".to_string(),
//!     position: Some(UserPosition::new(40.0, -73.0)?),
//!     expanded: false,
//! });
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
// Cannot be moved to function level.
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod geocode;
pub mod llm;
pub mod models;
pub mod services;
pub mod tags;

// Re-exports for convenience
pub use config::{GeocoderConfig, LlmConfig, SearchConfig, TagRegistryConfig, WayfindConfig};
pub use geocode::{GeocodeQuery, Geocoder, NominatimClient, Viewbox};
pub use llm::LlmProvider;
pub use models::{OsmTag, QueryIntent, ResultSet, SearchResult, UserPosition};
pub use services::{IntentResolver, SearchRequest, SearchService};
pub use tags::{TagRegistry, TaginfoClient};

/// Error type for wayfind operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Out-of-range coordinates, empty search term, malformed intent JSON |
/// | `OperationFailed` | LLM/geocoder/tag-registry transport failures, non-success HTTP status |
///
/// Errors never cross the pipeline boundary: the intent resolver degrades to
/// a minimal fallback intent and the geocode resolver advances through its
/// fallback ladder. The variants exist for the seams *between* stages.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A latitude/longitude is outside its valid range
    /// - The LLM reply fails JSON parsing or schema validation
    /// - A search term is empty after trimming
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - An upstream HTTP request fails (timeout, connect, DNS)
    /// - An upstream API returns a non-success status
    /// - A response body cannot be deserialized
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for wayfind operations.
pub type Result<T> = std::result::Result<T, Error>;
