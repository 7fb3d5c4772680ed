use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::is_within_bounding_box;
use crate::models::{AddressPatch, AddressRecord, BoundingBox, NewAddress};

/// Errors that can occur when talking to an address store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Unsupported store backend: {0}")]
    UnsupportedBackend(String),
}

/// Persistent record store behind the HTTP layer
///
/// `list_all` and `list_within` feed the proximity search; both return records
/// ordered by id so results are stable across calls.
#[async_trait]
pub trait AddressStore: Send + Sync {
    async fn create(&self, address: NewAddress) -> Result<AddressRecord, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<AddressRecord>, StoreError>;

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<AddressRecord>, StoreError>;

    /// Returns `None` if no record has this id
    async fn update(&self, id: i64, patch: AddressPatch) -> Result<Option<AddressRecord>, StoreError>;

    /// Returns `false` if no record has this id
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn list_all(&self) -> Result<Vec<AddressRecord>, StoreError>;

    /// Records inside `bbox`. Stores with an index should override this.
    async fn list_within(&self, bbox: &BoundingBox) -> Result<Vec<AddressRecord>, StoreError> {
        let records = self.list_all().await?;
        Ok(records
            .into_iter()
            .filter(|record| is_within_bounding_box(&record.coordinate(), bbox))
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    records: BTreeMap<i64, AddressRecord>,
}

/// Process-local store, used for tests and the `memory` backend
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressStore for InMemoryStore {
    async fn create(&self, address: NewAddress) -> Result<AddressRecord, StoreError> {
        let mut state = self.state.write().await;
        state.next_id += 1;

        let record = AddressRecord {
            id: state.next_id,
            street: address.street,
            city: address.city,
            state: address.state,
            country: address.country,
            postal_code: address.postal_code,
            latitude: address.latitude,
            longitude: address.longitude,
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<AddressRecord>, StoreError> {
        Ok(self.state.read().await.records.get(&id).cloned())
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<AddressRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .records
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, patch: AddressPatch) -> Result<Option<AddressRecord>, StoreError> {
        let mut state = self.state.write().await;

        Ok(state.records.get_mut(&id).map(|record| {
            patch.apply_to(record);
            record.updated_at = Some(chrono::Utc::now());
            record.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().await.records.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<AddressRecord>, StoreError> {
        Ok(self.state.read().await.records.values().cloned().collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculate_bounding_box;
    use crate::models::Coordinate;

    fn new_address(city: &str, lat: f64, lon: f64) -> NewAddress {
        NewAddress {
            street: "1 Main St".to_string(),
            city: city.to_string(),
            state: None,
            country: "Testland".to_string(),
            postal_code: None,
            latitude: lat,
            longitude: lon,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = InMemoryStore::new();
        let a = store.create(new_address("A", 0.0, 0.0)).await.unwrap();
        let b = store.create(new_address("B", 1.0, 1.0)).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(a.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store.create(new_address(&format!("City {}", i), 0.0, i as f64)).await.unwrap();
        }

        let page = store.list(1, 2).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);

        assert!(store.list(10, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = InMemoryStore::new();

        assert!(store.update(42, AddressPatch::default()).await.unwrap().is_none());
        assert!(!store.delete(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_sets_timestamp() {
        let store = InMemoryStore::new();
        let created = store.create(new_address("A", 0.0, 0.0)).await.unwrap();

        let patch = AddressPatch {
            street: Some("2 Side St".to_string()),
            ..Default::default()
        };
        let updated = store.update(created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.street, "2 Side St");
        assert!(updated.updated_at.is_some());
        assert_eq!(store.get(created.id).await.unwrap().unwrap().street, "2 Side St");
    }

    #[tokio::test]
    async fn test_list_within_default_filters_by_box() {
        let store = InMemoryStore::new();
        store.create(new_address("Near", 0.0, 0.1)).await.unwrap();
        store.create(new_address("Far", 0.0, 20.0)).await.unwrap();

        let bbox = calculate_bounding_box(Coordinate::new(0.0, 0.0).unwrap(), 50.0);
        let inside = store.list_within(&bbox).await.unwrap();

        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].city, "Near");
    }
}
