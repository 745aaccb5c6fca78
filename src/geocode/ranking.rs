//! Distance ranking of geocoded results.

use crate::models::{SearchResult, UserPosition};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between a position and a point, via the haversine
/// formula.
#[must_use]
pub fn haversine_km(from: UserPosition, to_latitude: f64, to_longitude: f64) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to_latitude.to_radians();
    let d_lat = (to_latitude - from.latitude).to_radians();
    let d_lon = (to_longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Ranks results by distance from the caller position and caps to the page
/// size.
///
/// Without a position, provider order is kept. With one, results are sorted
/// ascending by haversine distance (stable, so provider order breaks ties)
/// and annotated with the computed distance. Truncation happens after
/// sorting — ranking must see the full candidate set.
#[must_use]
pub fn rank(
    mut results: Vec<SearchResult>,
    position: Option<UserPosition>,
    page_size: usize,
) -> Vec<SearchResult> {
    if let Some(position) = position {
        for result in &mut results {
            result.distance_km = Some(haversine_km(
                position,
                result.latitude,
                result.longitude,
            ));
        }
        // sort_by is stable; NaN cannot occur because positions and parsed
        // coordinates are finite.
        results.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
    results.truncate(page_size);
    results
}
