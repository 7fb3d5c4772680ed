// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AddressPatch, AddressRecord, BoundingBox, Coordinate, NewAddress, ProximityQuery};
pub use requests::{CreateAddressRequest, ListAddressesParams, NearbyAddressesRequest, UpdateAddressRequest};
pub use responses::{ErrorResponse, HealthResponse, MessageResponse, NearbyAddress, RootResponse};
