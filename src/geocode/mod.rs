//! Geocoding: query synthesis, provider client, and ranking.

mod nominatim;
mod query;
mod ranking;

pub use nominatim::NominatimClient;
pub use query::{synthesize, FULL_LIMIT, LAST_RESORT_LIMIT};
pub use ranking::{haversine_km, rank};

use crate::Result;
use crate::models::{SearchResult, UserPosition};

/// Degrees of viewbox half-width per kilometer of radius.
///
/// A rough flat-earth approximation (1 km ~ 0.01 degrees on both axes,
/// doubled for margin) that ignores latitude convergence. Kept verbatim for
/// behavioral compatibility with the original front end; the imprecision is
/// acceptable because the viewbox only biases the geocoder, it does not
/// filter results.
pub const VIEWBOX_DEGREES_PER_KM: f64 = 0.02;

/// A rectangular bounding region scoping a geocoding search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewbox {
    /// Western longitude.
    pub left: f64,
    /// Northern latitude.
    pub top: f64,
    /// Eastern longitude.
    pub right: f64,
    /// Southern latitude.
    pub bottom: f64,
}

impl Viewbox {
    /// Builds a box of half-width `radius_km * 0.02` degrees centered on a
    /// position.
    #[must_use]
    pub fn around(center: UserPosition, radius_km: f64) -> Self {
        let delta = radius_km * VIEWBOX_DEGREES_PER_KM;
        Self {
            left: center.longitude - delta,
            top: center.latitude + delta,
            right: center.longitude + delta,
            bottom: center.latitude - delta,
        }
    }

    /// Renders the box as a Nominatim `viewbox` parameter
    /// (`left,top,right,bottom`).
    #[must_use]
    pub fn as_param(&self) -> String {
        format!("{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

/// One geocoding request: term list, optional bounding, result cap.
///
/// Derived deterministically from an intent (or built plain from raw text on
/// fallback tiers); rebuilt per attempt, never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeQuery {
    /// Search terms, joined by spaces into the `q` parameter.
    pub terms: Vec<String>,
    /// Bounding viewbox, when the intent had coordinates.
    pub viewbox: Option<Viewbox>,
    /// Whether the viewbox should bias the search.
    pub bounded: bool,
    /// Maximum results requested from the provider.
    pub limit: usize,
}

impl GeocodeQuery {
    /// Builds an unbounded plain-term query (fallback tiers).
    #[must_use]
    pub fn plain(term: &str, limit: usize) -> Self {
        Self {
            terms: vec![term.to_string()],
            viewbox: None,
            bounded: false,
            limit,
        }
    }

    /// The `q` parameter value.
    #[must_use]
    pub fn q(&self) -> String {
        self.terms.join(" ")
    }
}

/// Trait for geocoding providers.
pub trait Geocoder: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Executes one geocoding query.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status; the
    /// caller's fallback ladder decides what happens next.
    fn search(&self, query: &GeocodeQuery) -> Result<Vec<SearchResult>>;
}
