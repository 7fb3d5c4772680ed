// Unit tests for the distance and proximity search properties

use address_book::core::{
    calculate_bounding_box, haversine_distance, is_within_bounding_box, BoundingBoxScan,
    LinearScan, Located, ProximitySearch, EARTH_RADIUS_KM,
};
use address_book::models::{Coordinate, ProximityQuery};
use proptest::prelude::*;

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

/// Synthetic record with an id, so results can be compared by identity
#[derive(Debug, Clone, PartialEq)]
struct Site {
    id: usize,
    at: Coordinate,
}

impl Located for Site {
    fn coordinate(&self) -> Coordinate {
        self.at
    }
}

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| coord(lat, lon))
}

/// Centers anywhere, with extra weight near the poles and the antimeridian
fn search_center() -> impl Strategy<Value = Coordinate> {
    prop_oneof![
        coordinate(),
        (
            prop_oneof![Just(90.0), Just(-90.0), 85.0f64..=90.0, -90.0f64..=-85.0],
            -180.0f64..=180.0
        )
            .prop_map(|(lat, lon)| coord(lat, lon)),
        (
            -90.0f64..=90.0,
            prop_oneof![Just(180.0), Just(-180.0), 175.0f64..=180.0, -180.0f64..=-175.0]
        )
            .prop_map(|(lat, lon)| coord(lat, lon)),
    ]
}

fn thresholds() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        0.0f64..50.0,
        0.0f64..2_000.0,
        0.0f64..25_000.0,
        Just(f64::INFINITY),
    ]
}

/// Shift a coordinate by degree offsets, clamping latitude and wrapping longitude
fn offset(center: Coordinate, dlat: f64, dlon: f64) -> Coordinate {
    let lat = (center.latitude() + dlat).clamp(-90.0, 90.0);
    let mut lon = center.longitude() + dlon;
    if lon > 180.0 {
        lon -= 360.0;
    } else if lon < -180.0 {
        lon += 360.0;
    }
    coord(lat, lon)
}

/// Sites clustered around a center, so small radii still catch some of them
fn sites_around(center: Coordinate, spread_deg: f64, max: usize) -> impl Strategy<Value = Vec<Site>> {
    prop::collection::vec((-spread_deg..=spread_deg, -spread_deg..=spread_deg), 0..max).prop_map(
        move |offsets| {
            offsets
                .into_iter()
                .enumerate()
                .map(|(id, (dlat, dlon))| Site { id, at: offset(center, dlat, dlon) })
                .collect()
        },
    )
}

fn sites(max: usize) -> impl Strategy<Value = Vec<Site>> {
    prop::collection::vec(coordinate(), 0..max).prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(id, at)| Site { id, at })
            .collect()
    })
}

fn ids(matches: &[address_book::Nearby<&Site>]) -> Vec<usize> {
    matches.iter().map(|m| m.record.id).collect()
}

#[test]
fn test_haversine_distance_zero() {
    assert_eq!(haversine_distance(0.0, 0.0, 0.0, 0.0), 0.0);
    assert_eq!(haversine_distance(40.7128, -74.0060, 40.7128, -74.0060), 0.0);
}

proptest! {
    #[test]
    fn test_identity(p in coordinate()) {
        prop_assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_symmetry(a in coordinate(), b in coordinate()) {
        let ab = a.distance_to(&b);
        let ba = b.distance_to(&a);
        prop_assert!((ab - ba).abs() < 1e-9, "asymmetric: {} vs {}", ab, ba);
    }

    #[test]
    fn test_triangle_inequality(a in coordinate(), b in coordinate(), c in coordinate()) {
        let direct = a.distance_to(&c);
        let via = a.distance_to(&b) + b.distance_to(&c);
        prop_assert!(direct <= via + 1e-3, "{} > {}", direct, via);
    }

    #[test]
    fn test_distance_is_bounded(a in coordinate(), b in coordinate()) {
        let d = a.distance_to(&b);
        prop_assert!((0.0..=std::f64::consts::PI * EARTH_RADIUS_KM + 1e-9).contains(&d));
    }
}

#[test]
fn test_new_york_to_london() {
    let distance = coord(40.7128, -74.0060).distance_to(&coord(51.5074, -0.1278));
    assert!((distance - 5570.0).abs() < 55.7, "Expected ~5570km, got {}", distance);
}

#[test]
fn test_half_circumference() {
    let distance = coord(0.0, 0.0).distance_to(&coord(0.0, 180.0));
    assert!((distance - 20015.0).abs() < 200.0, "Expected ~20015km, got {}", distance);
    assert!(distance.is_finite());
}

#[test]
fn test_pole_to_pole() {
    let distance = coord(90.0, 0.0).distance_to(&coord(-90.0, 0.0));
    assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.01);
}

#[test]
fn test_longitude_wraparound() {
    let distance = coord(0.0, 179.0).distance_to(&coord(0.0, -179.0));
    assert!((distance - 222.4).abs() < 1.0, "Expected ~222km, got {}", distance);
}

#[test]
fn test_pole_adjacent_longitudes_are_close() {
    // Near the pole, a large longitude difference is a short hop
    let distance = coord(89.999, 0.0).distance_to(&coord(89.999, 180.0));
    assert!(distance < 0.3, "Expected ~0.22km, got {}", distance);
}

#[test]
fn test_threshold_boundary_is_inclusive() {
    let center = coord(0.0, 0.0);
    let at = |km: f64| coord(0.0, (km / EARTH_RADIUS_KM).to_degrees());

    let sites = vec![
        Site { id: 1, at: at(5.0) },
        Site { id: 2, at: at(5.0000001) },
        Site { id: 3, at: at(4.9999999) },
    ];

    // Use the computed distance of the first site as the threshold, so the
    // comparison is exercised at exact equality.
    let threshold = center.distance_to(&sites[0].at);
    assert!((threshold - 5.0).abs() < 1e-9);

    let query = ProximityQuery::new(center, threshold).unwrap();
    assert_eq!(ids(&LinearScan.find_within(&query, &sites)), vec![1, 3]);
    assert_eq!(ids(&BoundingBoxScan.find_within(&query, &sites)), vec![1, 3]);
}

#[test]
fn test_empty_input() {
    let query = ProximityQuery::new(coord(10.0, 10.0), 100.0).unwrap();
    let sites: Vec<Site> = Vec::new();

    assert!(LinearScan.find_within(&query, &sites).is_empty());
    assert!(BoundingBoxScan.find_within(&query, &sites).is_empty());
}

#[test]
fn test_huge_threshold_returns_everything() {
    let center = coord(-12.0, 130.0);
    let sites: Vec<Site> = (0..=36)
        .map(|i| Site { id: i, at: coord(i as f64 * 5.0 - 90.0, i as f64 * 10.0 - 180.0) })
        .collect();
    let query = ProximityQuery::new(center, 41_000.0).unwrap();

    assert_eq!(LinearScan.find_within(&query, &sites).len(), sites.len());
    assert_eq!(BoundingBoxScan.find_within(&query, &sites).len(), sites.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn test_scan_completeness_against_precomputed_distances(
        (center, sites, threshold) in search_center()
            .prop_flat_map(|c| (Just(c), sites_around(c, 3.0, 120), thresholds()))
    ) {
        let distances: Vec<f64> = sites.iter().map(|s| center.distance_to(&s.at)).collect();
        let query = ProximityQuery::new(center, threshold).unwrap();

        let expected: Vec<usize> = sites
            .iter()
            .zip(&distances)
            .filter(|(_, d)| **d <= threshold)
            .map(|(s, _)| s.id)
            .collect();

        prop_assert_eq!(ids(&LinearScan.find_within(&query, &sites)), expected);
    }

    #[test]
    fn test_bounding_box_scan_matches_linear_scan(
        (center, clustered, threshold) in search_center()
            .prop_flat_map(|c| (Just(c), sites_around(c, 5.0, 200), thresholds())),
        scattered in sites(50),
    ) {
        let mut clustered = clustered;
        let base = clustered.len();
        clustered.extend(scattered.into_iter().map(|s| Site { id: s.id + base, at: s.at }));

        let query = ProximityQuery::new(center, threshold).unwrap();
        let linear = LinearScan.find_within(&query, &clustered);
        let boxed = BoundingBoxScan.find_within(&query, &clustered);

        prop_assert_eq!(ids(&linear), ids(&boxed));
    }

    #[test]
    fn test_bounding_box_contains_every_match(
        (center, sites, radius) in search_center()
            .prop_flat_map(|c| (Just(c), sites_around(c, 8.0, 200), 0.0f64..1_000.0))
    ) {
        let bbox = calculate_bounding_box(center, radius);
        for site in &sites {
            if center.distance_to(&site.at) <= radius {
                prop_assert!(
                    is_within_bounding_box(&site.at, &bbox),
                    "{:?} within {}km but outside {:?}",
                    site.at,
                    radius,
                    bbox
                );
            }
        }
    }
}
