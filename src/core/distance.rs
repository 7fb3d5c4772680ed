use std::f64::consts::{FRAC_PI_2, PI};

use crate::models::{BoundingBox, Coordinate};

/// Earth's mean radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Padding added to every bounding box edge, in degrees (about 0.1 m)
const BOX_MARGIN_DEG: f64 = 1e-6;

/// Calculate the Haversine distance between two points in kilometers
///
/// Uses a spherical Earth, so results are within ~0.5% of the ellipsoidal
/// distance. The argument to `asin` is clamped so near-antipodal points can't
/// drift past 1 and produce NaN. Identical points give exactly `0.0`.
///
/// Inputs are not validated here: a NaN coordinate yields a NaN distance.
/// Use [`Coordinate::distance_to`] for checked input.
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2.to_radians() - lon1.to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // clamp, unlike min, keeps NaN
    let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_KM * c
}

impl Coordinate {
    /// Great-circle distance to `other` in kilometers
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(
            self.latitude(),
            self.longitude(),
            other.latitude(),
            other.longitude(),
        )
    }
}

/// Calculate a bounding box around a center point
///
/// The box contains every point whose haversine distance from `center` is at
/// most `radius_km`, so it can reject candidates before the exact check
/// without changing the result. Near a pole the box spans every longitude;
/// across the antimeridian it wraps (`min_lon > max_lon`).
///
/// # Arguments
/// * `center` - Center of the search circle
/// * `radius_km` - Radius in kilometers, non-negative
///
/// # Returns
/// BoundingBox with min/max lat/lon in degrees
pub fn calculate_bounding_box(center: Coordinate, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;

    // Also catches an infinite radius
    if !(angular < PI) {
        return BoundingBox::WORLD;
    }

    let lat = center.latitude().to_radians();
    let min_lat = (lat - angular).to_degrees() - BOX_MARGIN_DEG;
    let max_lat = (lat + angular).to_degrees() + BOX_MARGIN_DEG;

    // Circle covers a pole: every meridian passes through it
    if min_lat <= Coordinate::MIN_LATITUDE || max_lat >= Coordinate::MAX_LATITUDE {
        return BoundingBox {
            min_lat: min_lat.max(Coordinate::MIN_LATITUDE),
            max_lat: max_lat.min(Coordinate::MAX_LATITUDE),
            min_lon: Coordinate::MIN_LONGITUDE,
            max_lon: Coordinate::MAX_LONGITUDE,
        };
    }

    // Longitude half-width at the circle's widest point
    let lon_delta = (angular.sin() / lat.cos()).clamp(-1.0, 1.0).asin();
    debug_assert!(lon_delta <= FRAC_PI_2);
    let lon_delta = lon_delta.to_degrees() + BOX_MARGIN_DEG;

    let mut min_lon = center.longitude() - lon_delta;
    let mut max_lon = center.longitude() + lon_delta;

    if min_lon < Coordinate::MIN_LONGITUDE {
        min_lon += 360.0;
    }
    if max_lon > Coordinate::MAX_LONGITUDE {
        max_lon -= 360.0;
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: &Coordinate, bbox: &BoundingBox) -> bool {
    let lat = point.latitude();
    let lon = point.longitude();

    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }

    if bbox.wraps_antimeridian() {
        lon >= bbox.min_lon || lon <= bbox.max_lon
    } else {
        lon >= bbox.min_lon && lon <= bbox.max_lon
    }
}
