use serde::{Deserialize, Serialize};

use crate::core::error::GeoError;

/// A validated point on the globe, in degrees
///
/// Construction goes through [`Coordinate::new`], which rejects values outside
/// latitude [-90, 90] / longitude [-180, 180] and any non-finite input. Once a
/// `Coordinate` exists the distance code can trust it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub const MIN_LATITUDE: f64 = -90.0;
    pub const MAX_LATITUDE: f64 = 90.0;
    pub const MIN_LONGITUDE: f64 = -180.0;
    pub const MAX_LONGITUDE: f64 = 180.0;

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (Self::MIN_LATITUDE..=Self::MAX_LATITUDE).contains(&latitude)
            && (Self::MIN_LONGITUDE..=Self::MAX_LONGITUDE).contains(&longitude);

        if !valid {
            return Err(GeoError::InvalidCoordinate { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }

    /// Build a coordinate from values the database already range-checked.
    pub(crate) fn trusted(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[cfg(test)]
impl From<Coordinate> for geo::Point<f64> {
    fn from(value: Coordinate) -> Self {
        geo::Point::new(value.longitude, value.latitude)
    }
}

/// Stored address, as returned by the store and the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AddressRecord {
    pub id: i64,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AddressRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::trusted(self.latitude, self.longitude)
    }
}

/// Fields for a new address, already validated and trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AddressPatch {
    /// Apply the patch to a record in place
    pub fn apply_to(&self, record: &mut AddressRecord) {
        if let Some(street) = &self.street {
            record.street = street.clone();
        }
        if let Some(city) = &self.city {
            record.city = city.clone();
        }
        if let Some(state) = &self.state {
            record.state = Some(state.clone());
        }
        if let Some(country) = &self.country {
            record.country = country.clone();
        }
        if let Some(postal_code) = &self.postal_code {
            record.postal_code = Some(postal_code.clone());
        }
        if let Some(latitude) = self.latitude {
            record.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            record.longitude = longitude;
        }
    }
}

/// Center point plus search radius
///
/// The radius may be zero (only coincident points match) or infinite (every
/// point matches). NaN and negative radii are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    pub center: Coordinate,
    pub distance_km: f64,
}

impl ProximityQuery {
    pub fn new(center: Coordinate, distance_km: f64) -> Result<Self, GeoError> {
        if distance_km.is_nan() || distance_km < 0.0 {
            return Err(GeoError::InvalidDistance(distance_km));
        }

        Ok(Self { center, distance_km })
    }
}

/// Geospatial bounding box, in degrees
///
/// When `min_lon > max_lon` the box crosses the antimeridian and covers
/// `[min_lon, 180] ∪ [-180, max_lon]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const WORLD: BoundingBox = BoundingBox {
        min_lat: Coordinate::MIN_LATITUDE,
        max_lat: Coordinate::MAX_LATITUDE,
        min_lon: Coordinate::MIN_LONGITUDE,
        max_lon: Coordinate::MAX_LONGITUDE,
    };

    pub fn wraps_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }
}
