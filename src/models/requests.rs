use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::{AddressPatch, NewAddress};

/// Request to create an address
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAddressRequest {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub street: String,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub city: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub country: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl From<CreateAddressRequest> for NewAddress {
    fn from(req: CreateAddressRequest) -> Self {
        Self {
            street: req.street.trim().to_string(),
            city: req.city.trim().to_string(),
            state: req.state,
            country: req.country.trim().to_string(),
            postal_code: req.postal_code,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

/// Request to update an address; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub street: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub country: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl From<UpdateAddressRequest> for AddressPatch {
    fn from(req: UpdateAddressRequest) -> Self {
        Self {
            street: req.street.map(|s| s.trim().to_string()),
            city: req.city.map(|s| s.trim().to_string()),
            state: req.state,
            country: req.country.map(|s| s.trim().to_string()),
            postal_code: req.postal_code,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

/// Pagination for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListAddressesParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// Request to find addresses around a point
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyAddressesRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub distance_km: f64,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Field cannot be empty or only whitespace".into());
        return Err(err);
    }
    Ok(())
}
