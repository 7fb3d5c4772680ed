use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{calculate_bounding_box, ProximitySearch, SearchStrategy};
use crate::models::{
    AddressRecord, Coordinate, CreateAddressRequest, HealthResponse, ListAddressesParams,
    MessageResponse, NearbyAddress, NearbyAddressesRequest, ProximityQuery, RootResponse,
    UpdateAddressRequest,
};
use crate::routes::error_response;
use crate::services::{AddressStore, CacheKey, CacheManager};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AddressStore>,
    pub cache: Arc<CacheManager>,
    pub search: SearchStrategy,
}

/// Configure all address-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/addresses")
                .route("", web::post().to(create_address))
                .route("", web::get().to(list_addresses))
                .route("/nearby", web::post().to(nearby_addresses))
                .route("/{address_id}", web::get().to(get_address))
                .route("/{address_id}", web::put().to(update_address))
                .route("/{address_id}", web::delete().to(delete_address)),
        );
}

async fn root() -> impl Responder {
    HttpResponse::Ok().json(RootResponse {
        message: "Welcome to the Address Book API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let (status, message) = if store_healthy {
        ("healthy", "Address Book API is running")
    } else {
        ("degraded", "Address store is unreachable")
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        message: message.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Create address endpoint
///
/// POST /addresses
async fn create_address(
    state: web::Data<AppState>,
    req: web::Json<CreateAddressRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let req = req.into_inner();
    tracing::info!("Creating new address in {}, {}", req.city.trim(), req.country.trim());

    match state.store.create(req.into()).await {
        Ok(address) => {
            tracing::info!("Address created with ID: {}", address.id);
            HttpResponse::Created().json(address)
        }
        Err(e) => {
            tracing::error!("Error creating address: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error creating address", e)
        }
    }
}

/// List addresses endpoint
///
/// GET /addresses?skip=0&limit=100
async fn list_addresses(
    state: web::Data<AppState>,
    params: web::Query<ListAddressesParams>,
) -> impl Responder {
    if let Err(errors) = params.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    tracing::info!("Retrieving addresses (skip: {}, limit: {})", params.skip, params.limit);

    match state.store.list(params.skip, params.limit).await {
        Ok(addresses) => HttpResponse::Ok().json(addresses),
        Err(e) => {
            tracing::error!("Error retrieving addresses: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving addresses", e)
        }
    }
}

/// Get address endpoint, served through the cache
///
/// GET /addresses/{address_id}
async fn get_address(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let address_id = path.into_inner();
    tracing::info!("Retrieving address with ID: {}", address_id);

    let cache_key = CacheKey::address(address_id);
    let token = state.cache.token().await;
    if let Ok(address) = state.cache.get::<AddressRecord>(&cache_key).await {
        return HttpResponse::Ok().json(address);
    }

    match state.store.get(address_id).await {
        Ok(Some(address)) => {
            match state.cache.set_if_fresh(&cache_key, &address, token).await {
                Ok(true) => {}
                Ok(false) => tracing::debug!("Address {} changed during read, not cached", address_id),
                Err(e) => tracing::warn!("Failed to cache address {}: {}", address_id, e),
            }
            HttpResponse::Ok().json(address)
        }
        Ok(None) => address_not_found(address_id),
        Err(e) => {
            tracing::error!("Error retrieving address {}: {}", address_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving address", e)
        }
    }
}

/// Update address endpoint; only the provided fields change
///
/// PUT /addresses/{address_id}
async fn update_address(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<UpdateAddressRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let address_id = path.into_inner();
    tracing::info!("Updating address with ID: {}", address_id);

    invalidate(&state, address_id).await;
    let result = state.store.update(address_id, req.into_inner().into()).await;
    invalidate(&state, address_id).await;

    match result {
        Ok(Some(address)) => {
            tracing::info!("Address {} updated successfully", address_id);
            HttpResponse::Ok().json(address)
        }
        Ok(None) => {
            tracing::warn!("Address {} not found for update", address_id);
            address_not_found(address_id)
        }
        Err(e) => {
            tracing::error!("Error updating address {}: {}", address_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error updating address", e)
        }
    }
}

/// Delete address endpoint
///
/// DELETE /addresses/{address_id}
async fn delete_address(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let address_id = path.into_inner();
    tracing::info!("Deleting address with ID: {}", address_id);

    invalidate(&state, address_id).await;
    let result = state.store.delete(address_id).await;
    invalidate(&state, address_id).await;

    match result {
        Ok(true) => {
            tracing::info!("Address {} deleted successfully", address_id);
            HttpResponse::Ok().json(MessageResponse {
                message: format!("Address {} deleted successfully", address_id),
            })
        }
        Ok(false) => {
            tracing::warn!("Address {} not found for deletion", address_id);
            address_not_found(address_id)
        }
        Err(e) => {
            tracing::error!("Error deleting address {}: {}", address_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error deleting address", e)
        }
    }
}

/// Nearby addresses endpoint
///
/// POST /addresses/nearby
///
/// Request body:
/// ```json
/// {
///   "latitude": 40.7128,
///   "longitude": -74.0060,
///   "distance_km": 25.0
/// }
/// ```
///
/// Returns every address within `distance_km` of the point, in id order, each
/// with its `distance_km` from the point.
async fn nearby_addresses(
    state: web::Data<AppState>,
    req: web::Json<NearbyAddressesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let query = match Coordinate::new(req.latitude, req.longitude)
        .and_then(|center| ProximityQuery::new(center, req.distance_km))
    {
        Ok(query) => query,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "Validation failed", e),
    };

    tracing::info!(
        "Searching addresses within {}km of ({}, {})",
        query.distance_km,
        req.latitude,
        req.longitude
    );

    let candidates = match state.search {
        SearchStrategy::Linear => state.store.list_all().await,
        SearchStrategy::BoundingBox => {
            let bbox = calculate_bounding_box(query.center, query.distance_km);
            state.store.list_within(&bbox).await
        }
    };

    let candidates = match candidates {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Error finding nearby addresses: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error finding nearby addresses",
                e,
            );
        }
    };

    let scanned = candidates.len();
    let nearby: Vec<NearbyAddress> = state
        .search
        .find_within(&query, candidates)
        .into_iter()
        .map(|m| NearbyAddress {
            address: m.record,
            distance_km: m.distance_km,
        })
        .collect();

    tracing::info!(
        "Found {} addresses within {}km ({} candidates scanned)",
        nearby.len(),
        query.distance_km,
        scanned
    );

    HttpResponse::Ok().json(nearby)
}

fn address_not_found(address_id: i64) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        "Address not found",
        format!("No address with ID {}", address_id),
    )
}

/// Drop the cached copy of an address; writes call this before and after the
/// store write so a concurrent read cannot keep the old row
async fn invalidate(state: &AppState, address_id: i64) {
    if let Err(e) = state.cache.delete(&CacheKey::address(address_id)).await {
        tracing::warn!("Failed to invalidate cache: {}", e);
    }
}
