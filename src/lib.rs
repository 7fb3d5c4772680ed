//! Address Book - address storage with great-circle proximity search
//!
//! The `core` module holds the pure distance and search code: haversine
//! distance, a conservative bounding box, and interchangeable
//! [`ProximitySearch`] implementations. Everything else is the service
//! around it: configuration, stores, cache and HTTP routes.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    calculate_bounding_box, haversine_distance, BoundingBoxScan, GeoError, LinearScan, Located,
    Nearby, ProximitySearch, SearchStrategy,
};
pub use crate::models::{AddressRecord, BoundingBox, Coordinate, ProximityQuery};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let center = Coordinate::new(40.7128, -74.0060).unwrap();
        let bbox = calculate_bounding_box(center, 10.0);
        assert!(bbox.min_lat < 40.7128);
    }
}
