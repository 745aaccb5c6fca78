//! Property-based tests for the pure pipeline stages.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Query synthesis is idempotent and emits at most one tag clause
//! - The viewbox is centered on the intent coordinates
//! - Ranking output is sorted by non-decreasing distance and never grows

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use wayfind::geocode::{haversine_km, rank, synthesize};
use wayfind::models::{LocationContext, LocationKind, OsmTag, QueryIntent, UserPosition};
use wayfind::SearchResult;

fn arb_position() -> impl Strategy<Value = UserPosition> {
    (-89.0f64..89.0, -179.0f64..179.0)
        .prop_map(|(latitude, longitude)| UserPosition::new(latitude, longitude).unwrap())
}

fn arb_tags() -> impl Strategy<Value = Vec<OsmTag>> {
    prop::collection::vec(
        ("[a-z]{1,12}", "[a-z_]{1,16}").prop_map(|(k, v)| OsmTag::new(k, v)),
        0..4,
    )
}

fn arb_intent() -> impl Strategy<Value = QueryIntent> {
    (
        "[a-zA-Z ]{1,30}",
        arb_tags(),
        prop::option::of((arb_position(), prop::option::of(0.5f64..50.0))),
    )
        .prop_map(|(term, tags, location)| QueryIntent {
            location: location.map(|(coordinates, radius)| LocationContext {
                kind: Some(LocationKind::Current),
                coordinates: Some(coordinates),
                area: None,
                radius,
            }),
            osm_tags: tags,
            ..QueryIntent::minimal(term)
        })
}

fn arb_results() -> impl Strategy<Value = Vec<SearchResult>> {
    prop::collection::vec(
        (-89.0f64..89.0, -179.0f64..179.0).prop_map(|(latitude, longitude)| SearchResult {
            latitude,
            longitude,
            display_name: "place".to_string(),
            source_id: "1".to_string(),
            source_type: "node".to_string(),
            distance_km: None,
        }),
        0..20,
    )
}

proptest! {
    /// Property: synthesize is a pure function - two calls agree exactly.
    #[test]
    fn prop_synthesize_idempotent(intent in arb_intent()) {
        let first = synthesize(&intent);
        let second = synthesize(&intent);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.q(), second.q());
    }

    /// Property: at most one bracketed tag clause, built from the first tag.
    #[test]
    fn prop_synthesize_single_tag_clause(intent in arb_intent()) {
        let query = synthesize(&intent);
        let q = query.q();
        prop_assert_eq!(q.matches('[').count(), usize::from(!intent.osm_tags.is_empty()));
        if let Some(tag) = intent.osm_tags.first() {
            let clause = format!("[{}={}]", tag.key, tag.value);
            prop_assert!(q.ends_with(&clause));
        }
    }

    /// Property: the query is bounded iff the intent has coordinates, and the
    /// viewbox is centered on them.
    #[test]
    fn prop_synthesize_viewbox_centered(intent in arb_intent()) {
        let query = synthesize(&intent);
        prop_assert_eq!(query.bounded, intent.coordinates().is_some());
        if let (Some(center), Some(viewbox)) = (intent.coordinates(), query.viewbox) {
            let mid_lon = f64::midpoint(viewbox.left, viewbox.right);
            let mid_lat = f64::midpoint(viewbox.top, viewbox.bottom);
            prop_assert!((mid_lon - center.longitude).abs() < 1e-9);
            prop_assert!((mid_lat - center.latitude).abs() < 1e-9);
        }
    }

    /// Property: ranked output is sorted by non-decreasing distance and
    /// capped at the page size.
    #[test]
    fn prop_rank_sorted_and_capped(
        results in arb_results(),
        position in arb_position(),
        page_size in 1usize..12,
    ) {
        let input_len = results.len();
        let ranked = rank(results, Some(position), page_size);
        prop_assert!(ranked.len() <= page_size);
        prop_assert!(ranked.len() <= input_len);
        let distances: Vec<f64> = ranked
            .iter()
            .map(|r| r.distance_km.unwrap())
            .collect();
        prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Property: without a position, rank only truncates.
    #[test]
    fn prop_rank_without_position_preserves_order(
        results in arb_results(),
        page_size in 1usize..12,
    ) {
        let expected: Vec<SearchResult> =
            results.iter().take(page_size).cloned().collect();
        let ranked = rank(results, None, page_size);
        prop_assert_eq!(ranked, expected);
    }

    /// Property: haversine is symmetric and non-negative.
    #[test]
    fn prop_haversine_symmetric(a in arb_position(), b in arb_position()) {
        let ab = haversine_km(a, b.latitude, b.longitude);
        let ba = haversine_km(b, a.latitude, a.longitude);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-6);
    }
}
