//! Structured query intent and its schema validation.
//!
//! The intent is the LLM's interpretation of a free-text query. LLM output is
//! an untrusted network payload: it is parsed strictly and then run through
//! [`QueryIntent::validate`] before anything downstream reads it. A reply
//! that fails either step pushes the resolver onto its fallback path.

use super::UserPosition;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default search radius in kilometers, applied whenever a location is known
/// but the model (or caller) gave no radius.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// An OSM `key=value` descriptive tag pair.
///
/// Tags only enter a [`QueryIntent`] after passing tag-registry validation;
/// an unvalidated tag is dropped, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsmTag {
    /// Tag key, e.g. `cuisine`.
    pub key: String,
    /// Tag value, e.g. `italian`.
    pub value: String,
}

impl OsmTag {
    /// Creates a tag pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// How the model scoped the query geographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationKind {
    /// "near me" — the caller's position should be injected.
    Current,
    /// A named area ("downtown Oslo").
    Area,
    /// Explicit coordinates supplied by the model.
    Coordinates,
    /// Anything else the model invented; treated as no indicator.
    Other,
}

impl From<String> for LocationKind {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "current" => Self::Current,
            "area" => Self::Area,
            "coordinates" => Self::Coordinates,
            _ => Self::Other,
        }
    }
}

impl From<LocationKind> for String {
    fn from(kind: LocationKind) -> Self {
        match kind {
            LocationKind::Current => "current".to_string(),
            LocationKind::Area => "area".to_string(),
            LocationKind::Coordinates => "coordinates".to_string(),
            LocationKind::Other => "other".to_string(),
        }
    }
}

/// Geographic scoping of an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocationContext {
    /// Location indicator from the model (`current` means "use caller position").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LocationKind>,
    /// Resolved coordinates, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<UserPosition>,
    /// Named area, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// Search radius in kilometers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl LocationContext {
    /// True if the model asked for the caller's current position.
    #[must_use]
    pub fn wants_current_position(&self) -> bool {
        self.kind == Some(LocationKind::Current)
    }
}

/// Price bracket filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    /// Cheap eats.
    Budget,
    /// Mid-range.
    Moderate,
    /// Higher-end.
    Upscale,
    /// Top bracket.
    Luxury,
}

/// Distance unit for an explicit distance filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Statute miles.
    Miles,
    /// Kilometers.
    Kilometers,
}

impl DistanceUnit {
    /// Conversion factor to kilometers.
    #[must_use]
    pub const fn to_km_factor(self) -> f64 {
        match self {
            Self::Miles => 1.609_344,
            Self::Kilometers => 1.0,
        }
    }
}

/// An explicit "within N miles/km" filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceFilter {
    /// Magnitude, must be positive.
    pub value: f64,
    /// Unit of the magnitude.
    pub unit: DistanceUnit,
}

impl DistanceFilter {
    /// The filter distance expressed in kilometers.
    #[must_use]
    pub fn as_km(&self) -> f64 {
        self.value * self.unit.to_km_factor()
    }
}

/// Non-geographic filters the model extracted from the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Only places open right now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    /// Price bracket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    /// Minimum rating, 0.0 to 5.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Cuisine names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cuisine: Vec<String>,
    /// Amenity names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    /// Explicit distance constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceFilter>,
}

/// The structured interpretation of one raw query.
///
/// Constructed once per search by the intent resolver and never mutated
/// afterwards; the query synthesizer only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryIntent {
    /// The core subject of the search. Required, non-empty.
    pub search_term: String,
    /// Geographic scoping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationContext>,
    /// Non-geographic filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    /// Registry-validated OSM tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub osm_tags: Vec<OsmTag>,
}

impl QueryIntent {
    /// Creates a minimal intent carrying only a search term.
    pub fn minimal(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            location: None,
            filters: None,
            osm_tags: Vec::new(),
        }
    }

    /// Creates the deterministic fallback intent used when the model call or
    /// its reply is unusable: the raw text as the term, the caller position
    /// (when known) with the default radius.
    pub fn fallback(raw_text: impl Into<String>, position: Option<UserPosition>) -> Self {
        let location = position.map(|coordinates| LocationContext {
            kind: Some(LocationKind::Current),
            coordinates: Some(coordinates),
            area: None,
            radius: Some(DEFAULT_RADIUS_KM),
        });
        Self {
            search_term: raw_text.into(),
            location,
            filters: None,
            osm_tags: Vec::new(),
        }
    }

    /// The effective search radius in kilometers (default when unset).
    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.location
            .as_ref()
            .and_then(|location| location.radius)
            .unwrap_or(DEFAULT_RADIUS_KM)
    }

    /// The intent's coordinates, if any.
    #[must_use]
    pub fn coordinates(&self) -> Option<UserPosition> {
        self.location
            .as_ref()
            .and_then(|location| location.coordinates)
    }

    /// Schema validation for a freshly parsed intent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on an empty search term, out-of-range
    /// coordinates, non-positive radius, a rating outside 0-5, a
    /// non-positive distance filter, or an empty tag key/value.
    pub fn validate(&self) -> Result<()> {
        if self.search_term.trim().is_empty() {
            return Err(Error::InvalidInput("searchTerm must be non-empty".into()));
        }
        if let Some(location) = &self.location {
            if let Some(coordinates) = &location.coordinates {
                coordinates.validate()?;
            }
            if let Some(radius) = location.radius {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(Error::InvalidInput(format!("invalid radius: {radius}")));
                }
            }
        }
        if let Some(filters) = &self.filters {
            if let Some(rating) = filters.rating {
                if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
                    return Err(Error::InvalidInput(format!("invalid rating: {rating}")));
                }
            }
            if let Some(distance) = &filters.distance {
                if !distance.value.is_finite() || distance.value <= 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "invalid distance value: {}",
                        distance.value
                    )));
                }
            }
        }
        for tag in &self.osm_tags {
            if tag.key.trim().is_empty() || tag.value.trim().is_empty() {
                return Err(Error::InvalidInput(
                    "osmTags entries must have non-empty key and value".into(),
                ));
            }
        }
        Ok(())
    }
}
