use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::models::{AddressPatch, AddressRecord, BoundingBox, NewAddress};
use crate::services::store::{AddressStore, StoreError};

const ADDRESS_COLUMNS: &str =
    "id, street, city, state, country, postal_code, latitude, longitude, created_at, updated_at";

/// PostgreSQL-backed address store
///
/// Migrations in `./migrations` run on connect. The `(latitude, longitude)`
/// index lets `list_within` push the bounding-box pre-filter into the query.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl AddressStore for PostgresClient {
    async fn create(&self, address: NewAddress) -> Result<AddressRecord, StoreError> {
        let query = format!(
            r#"
            INSERT INTO addresses (street, city, state, country, postal_code, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ADDRESS_COLUMNS
        );

        let record = sqlx::query_as::<_, AddressRecord>(&query)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.country)
            .bind(&address.postal_code)
            .bind(address.latitude)
            .bind(address.longitude)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Inserted address row {}", record.id);

        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<AddressRecord>, StoreError> {
        let query = format!("SELECT {} FROM addresses WHERE id = $1", ADDRESS_COLUMNS);

        let record = sqlx::query_as::<_, AddressRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<AddressRecord>, StoreError> {
        let query = format!(
            "SELECT {} FROM addresses ORDER BY id LIMIT $1 OFFSET $2",
            ADDRESS_COLUMNS
        );

        let records = sqlx::query_as::<_, AddressRecord>(&query)
            .bind(limit as i64)
            .bind(skip as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Only the provided fields change; `updated_at` is always refreshed.
    async fn update(&self, id: i64, patch: AddressPatch) -> Result<Option<AddressRecord>, StoreError> {
        let query = format!(
            r#"
            UPDATE addresses SET
                street = COALESCE($2, street),
                city = COALESCE($3, city),
                state = COALESCE($4, state),
                country = COALESCE($5, country),
                postal_code = COALESCE($6, postal_code),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ADDRESS_COLUMNS
        );

        let record = sqlx::query_as::<_, AddressRecord>(&query)
            .bind(id)
            .bind(&patch.street)
            .bind(&patch.city)
            .bind(&patch.state)
            .bind(&patch.country)
            .bind(&patch.postal_code)
            .bind(patch.latitude)
            .bind(patch.longitude)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<AddressRecord>, StoreError> {
        let query = format!("SELECT {} FROM addresses ORDER BY id", ADDRESS_COLUMNS);

        let records = sqlx::query_as::<_, AddressRecord>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn list_within(&self, bbox: &BoundingBox) -> Result<Vec<AddressRecord>, StoreError> {
        let longitude_clause = if bbox.wraps_antimeridian() {
            "(longitude >= $3 OR longitude <= $4)"
        } else {
            "longitude BETWEEN $3 AND $4"
        };

        let query = format!(
            r#"
            SELECT {}
            FROM addresses
            WHERE latitude BETWEEN $1 AND $2
              AND {}
            ORDER BY id
            "#,
            ADDRESS_COLUMNS, longitude_clause
        );

        let records = sqlx::query_as::<_, AddressRecord>(&query)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Bounding box pre-filter returned {} rows", records.len());

        Ok(records)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
