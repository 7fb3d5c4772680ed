use serde::Deserialize;

use crate::core::distance::{calculate_bounding_box, is_within_bounding_box};
use crate::models::{AddressRecord, Coordinate, ProximityQuery};

/// Anything that sits at a coordinate
pub trait Located {
    fn coordinate(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

impl Located for AddressRecord {
    fn coordinate(&self) -> Coordinate {
        AddressRecord::coordinate(self)
    }
}

impl<T: Located> Located for &T {
    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}

/// A record that matched a proximity query, with its distance from the center
#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<R> {
    pub record: R,
    pub distance_km: f64,
}

/// Filters a candidate source down to the records within a query's radius
///
/// Implementations must return exactly the records [`LinearScan`] returns, in
/// the order the source yields them. Only the cost may differ.
pub trait ProximitySearch {
    fn find_within<R, I>(&self, query: &ProximityQuery, source: I) -> Vec<Nearby<R>>
    where
        R: Located,
        I: IntoIterator<Item = R>;
}

/// Exact distance check; inclusive, no epsilon
#[inline]
fn exact_match<R: Located>(query: &ProximityQuery, record: R) -> Option<Nearby<R>> {
    let distance_km = query.center.distance_to(&record.coordinate());
    if distance_km <= query.distance_km {
        Some(Nearby { record, distance_km })
    } else {
        None
    }
}

/// Baseline search: haversine against every candidate
///
/// O(N) per query. This is the reference the other strategies are tested
/// against.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScan;

impl ProximitySearch for LinearScan {
    fn find_within<R, I>(&self, query: &ProximityQuery, source: I) -> Vec<Nearby<R>>
    where
        R: Located,
        I: IntoIterator<Item = R>,
    {
        source
            .into_iter()
            .filter_map(|record| exact_match(query, record))
            .collect()
    }
}

/// Bounding-box pre-filter followed by the exact haversine check
///
/// Still visits every candidate, but most of them are rejected with four
/// comparisons instead of trigonometry. The box is conservative, so the result
/// is identical to [`LinearScan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxScan;

impl ProximitySearch for BoundingBoxScan {
    fn find_within<R, I>(&self, query: &ProximityQuery, source: I) -> Vec<Nearby<R>>
    where
        R: Located,
        I: IntoIterator<Item = R>,
    {
        let bbox = calculate_bounding_box(query.center, query.distance_km);

        source
            .into_iter()
            .filter(|record| is_within_bounding_box(&record.coordinate(), &bbox))
            .filter_map(|record| exact_match(query, record))
            .collect()
    }
}

/// Configurable choice of search implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    Linear,
    #[default]
    BoundingBox,
}

impl ProximitySearch for SearchStrategy {
    fn find_within<R, I>(&self, query: &ProximityQuery, source: I) -> Vec<Nearby<R>>
    where
        R: Located,
        I: IntoIterator<Item = R>,
    {
        match self {
            SearchStrategy::Linear => LinearScan.find_within(query, source),
            SearchStrategy::BoundingBox => BoundingBoxScan.find_within(query, source),
        }
    }
}
