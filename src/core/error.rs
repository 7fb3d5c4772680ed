use thiserror::Error;

/// Errors raised when building geospatial values
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Invalid distance: {0} km")]
    InvalidDistance(f64),
}
