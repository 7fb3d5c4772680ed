// Core algorithm exports
pub mod distance;
pub mod error;
pub mod proximity;

pub use distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box, EARTH_RADIUS_KM};
pub use error::GeoError;
pub use proximity::{BoundingBoxScan, LinearScan, Located, Nearby, ProximitySearch, SearchStrategy};
