//! SQLite implementation of the mapping store.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingStore, StoreError};
use crate::utils::db_error::is_unique_violation;

/// SQLite-backed mapping store.
///
/// All operations are serialized through one async mutex held for the whole
/// call, including the commit. The lock never leaves this type.
pub struct SqliteMappingStore {
    pool: Arc<SqlitePool>,
    lock: Mutex<()>,
}

impl SqliteMappingStore {
    /// Creates a new store over a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            pool,
            lock: Mutex::new(()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool.as_ref()
    }
}

#[async_trait]
impl MappingStore for SqliteMappingStore {
    #[instrument(skip(self))]
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Mapping>, StoreError> {
        let _guard = self.lock.lock().await;

        let mapping = sqlx::query_as::<_, Mapping>(
            "SELECT id, long_url, expires_at FROM url_mapping WHERE long_url = ?1",
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(mapping)
    }

    #[instrument(skip(self))]
    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<Mapping>, StoreError> {
        let _guard = self.lock.lock().await;

        let mapping = sqlx::query_as::<_, Mapping>(
            "SELECT id, long_url, expires_at FROM url_mapping WHERE id = ?1",
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(mapping)
    }

    #[instrument(skip(self))]
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        let _guard = self.lock.lock().await;
        let mut tx = self.pool.begin().await?;

        if let Some(existing) = sqlx::query_as::<_, Mapping>(
            "SELECT id, long_url, expires_at FROM url_mapping WHERE long_url = ?1",
        )
        .bind(&new_mapping.long_url)
        .fetch_optional(&mut *tx)
        .await?
        {
            return Err(StoreError::LongUrlMapped(existing));
        }

        let inserted = sqlx::query(
            "INSERT INTO url_mapping (id, long_url, expires_at) VALUES (?1, ?2, ?3)",
        )
        .bind(&new_mapping.short_id)
        .bind(&new_mapping.long_url)
        .bind(new_mapping.expires_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(StoreError::ShortIdTaken(new_mapping.short_id));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;

        Ok(new_mapping.into())
    }

    #[instrument(skip(self))]
    async fn extend_expiration(&self, short_id: &str, expires_at: i64) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let affected = sqlx::query("UPDATE url_mapping SET expires_at = ?1 WHERE id = ?2")
            .bind(expires_at)
            .bind(short_id)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound(short_id.to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, now: i64) -> Result<u64, StoreError> {
        let _guard = self.lock.lock().await;

        let removed = sqlx::query("DELETE FROM url_mapping WHERE expires_at <= ?1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        Ok(removed)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let _guard = self.lock.lock().await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_mapping")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_expired(&self, now: i64) -> Result<i64, StoreError> {
        let _guard = self.lock.lock().await;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM url_mapping WHERE expires_at <= ?1")
                .bind(now)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}
