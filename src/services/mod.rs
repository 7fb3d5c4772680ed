// Service exports
pub mod cache;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager, CacheToken};
pub use postgres::PostgresClient;
pub use store::{AddressStore, InMemoryStore, StoreError};

use crate::config::DatabaseSettings;
use std::sync::Arc;

/// Build the configured address store
pub async fn connect_store(settings: &DatabaseSettings) -> Result<Arc<dyn AddressStore>, StoreError> {
    match settings.backend.as_str() {
        "postgres" => {
            let client = PostgresClient::from_settings(
                &settings.url,
                settings.max_connections,
                settings.min_connections,
                settings.acquire_timeout_secs,
                settings.idle_timeout_secs,
            )
            .await?;
            Ok(Arc::new(client))
        }
        "memory" => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(InMemoryStore::new()))
        }
        other => Err(StoreError::UnsupportedBackend(other.to_string())),
    }
}
