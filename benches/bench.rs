// Criterion benchmarks for Address Book proximity search

use address_book::core::{
    calculate_bounding_box, haversine_distance, BoundingBoxScan, LinearScan, ProximitySearch,
};
use address_book::models::{Coordinate, ProximityQuery};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Points spread over a ~10° square around New York
fn create_points(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            let lat_offset = (i as f64 * 0.0137) % 10.0 - 5.0;
            let lon_offset = (i as f64 * 0.0291) % 10.0 - 5.0;
            Coordinate::new(40.7128 + lat_offset, -74.0060 + lon_offset).unwrap()
        })
        .collect()
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(40.7128),
                black_box(-74.0060),
                black_box(40.72),
                black_box(-74.01),
            )
        });
    });
}

fn bench_bounding_box(c: &mut Criterion) {
    let center = Coordinate::new(40.7128, -74.0060).unwrap();

    c.bench_function("bounding_box_calculation", |b| {
        b.iter(|| calculate_bounding_box(black_box(center), black_box(50.0)));
    });
}

fn bench_find_within(c: &mut Criterion) {
    let center = Coordinate::new(40.7128, -74.0060).unwrap();
    let query = ProximityQuery::new(center, 50.0).unwrap();

    let mut group = c.benchmark_group("find_within");

    for count in [100, 1_000, 10_000, 100_000].iter() {
        let points = create_points(*count);

        group.bench_with_input(BenchmarkId::new("linear", count), count, |b, _| {
            b.iter(|| LinearScan.find_within(black_box(&query), black_box(&points)));
        });

        group.bench_with_input(BenchmarkId::new("bounding_box", count), count, |b, _| {
            b.iter(|| BoundingBoxScan.find_within(black_box(&query), black_box(&points)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_bounding_box,
    bench_find_within
);

criterion_main!(benches);
