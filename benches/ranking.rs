//! Benchmarks for the ranking stage.
//!
//! Ranking runs on every positioned search between the geocoder reply and
//! the presentation layer; it should stay well under a millisecond for the
//! candidate-set sizes the provider can return.

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wayfind::geocode::{haversine_km, rank};
use wayfind::models::{SearchResult, UserPosition};

fn candidates(count: usize) -> Vec<SearchResult> {
    (0..count)
        .map(|i| {
            let spread = (i as f64).mul_add(0.037, -1.3) % 2.0;
            SearchResult {
                latitude: 40.0 + spread,
                longitude: -73.0 - spread,
                display_name: format!("place {i}"),
                source_id: i.to_string(),
                source_type: "node".to_string(),
                distance_km: None,
            }
        })
        .collect()
}

fn reference() -> UserPosition {
    UserPosition {
        latitude: 40.0,
        longitude: -73.0,
    }
}

fn bench_haversine(c: &mut Criterion) {
    let position = reference();
    c.bench_function("haversine_single", |b| {
        b.iter(|| haversine_km(black_box(position), black_box(40.7), black_box(-73.9)));
    });
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    for count in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let results = candidates(count);
            b.iter(|| {
                rank(
                    black_box(results.clone()),
                    black_box(Some(reference())),
                    black_box(10),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_haversine, bench_rank);
criterion_main!(benches);
