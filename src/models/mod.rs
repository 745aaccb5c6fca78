//! Core data types for the search pipeline.

mod intent;
mod place;
mod position;

pub use intent::{
    DistanceFilter, DistanceUnit, LocationContext, LocationKind, OsmTag, PriceRange, QueryIntent,
    SearchFilters, DEFAULT_RADIUS_KM,
};
pub use place::{ResultSet, SearchResult, DEFAULT_PAGE_SIZE, EXPANDED_PAGE_SIZE};
pub use position::UserPosition;
