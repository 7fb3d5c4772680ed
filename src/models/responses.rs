use serde::{Deserialize, Serialize};
use crate::models::domain::AddressRecord;

/// Address returned by the nearby search, with its distance from the center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyAddress {
    #[serde(flatten)]
    pub address: AddressRecord,
    pub distance_km: f64,
}

/// Landing page response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Generic message response (used by delete)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
