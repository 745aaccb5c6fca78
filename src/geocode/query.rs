//! Query synthesis: intent to geocoding query.

use super::{GeocodeQuery, Viewbox};
use crate::models::QueryIntent;

/// Result cap for full-specificity and plain-term queries.
pub const FULL_LIMIT: usize = 10;

/// Reduced result cap for the last-resort fallback tier.
pub const LAST_RESORT_LIMIT: usize = 3;

/// Deterministically converts a validated intent into a geocoding query.
///
/// Pure and total:
/// - the term list starts with the search term;
/// - the FIRST registry-validated tag (if any) is appended as a bracketed
///   `[key=value]` clause — one tag only, even when several are present;
/// - known coordinates produce a viewbox of half-width `radius * 0.02`
///   degrees and mark the query bounded, with the radius defaulting to 5 km.
#[must_use]
pub fn synthesize(intent: &QueryIntent) -> GeocodeQuery {
    let mut terms = vec![intent.search_term.clone()];
    if let Some(tag) = intent.osm_tags.first() {
        terms.push(format!("[{}={}]", tag.key, tag.value));
    }

    let viewbox = intent
        .coordinates()
        .map(|center| Viewbox::around(center, intent.radius_km()));

    GeocodeQuery {
        terms,
        bounded: viewbox.is_some(),
        viewbox,
        limit: FULL_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationContext, LocationKind, OsmTag, UserPosition};

    fn intent_with_tags(tags: Vec<OsmTag>) -> QueryIntent {
        QueryIntent {
            osm_tags: tags,
            ..QueryIntent::minimal("Italian restaurants")
        }
    }

    #[test]
    fn test_plain_intent_unbounded() {
        let query = synthesize(&QueryIntent::minimal("coffee shops"));
        assert_eq!(query.q(), "coffee shops");
        assert!(query.viewbox.is_none());
        assert!(!query.bounded);
        assert_eq!(query.limit, FULL_LIMIT);
    }

    #[test]
    fn test_first_tag_only() {
        let query = synthesize(&intent_with_tags(vec![
            OsmTag::new("cuisine", "italian"),
            OsmTag::new("amenity", "restaurant"),
        ]));
        assert_eq!(query.q(), "Italian restaurants [cuisine=italian]");
        assert_eq!(query.q().matches('[').count(), 1);
    }

    #[test]
    fn test_coordinates_produce_bounded_viewbox() {
        let intent = QueryIntent {
            location: Some(LocationContext {
                kind: Some(LocationKind::Current),
                coordinates: Some(UserPosition {
                    latitude: 40.0,
                    longitude: -73.0,
                }),
                area: None,
                radius: Some(5.0),
            }),
            ..QueryIntent::minimal("Italian restaurants")
        };
        let query = synthesize(&intent);
        assert!(query.bounded);
        let viewbox = query.viewbox.unwrap();
        assert!((viewbox.top - 40.1).abs() < 1e-9);
        assert!((viewbox.bottom - 39.9).abs() < 1e-9);
    }

    #[test]
    fn test_radius_defaults_to_five_km() {
        let intent = QueryIntent {
            location: Some(LocationContext {
                kind: None,
                coordinates: Some(UserPosition {
                    latitude: 0.0,
                    longitude: 0.0,
                }),
                area: None,
                radius: None,
            }),
            ..QueryIntent::minimal("x")
        };
        let viewbox = synthesize(&intent).viewbox.unwrap();
        // 5 km default * 0.02 degrees/km
        assert!((viewbox.top - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let intent = intent_with_tags(vec![OsmTag::new("cuisine", "italian")]);
        let first = synthesize(&intent);
        let second = synthesize(&intent);
        assert_eq!(first, second);
        assert_eq!(first.q(), second.q());
    }
}
