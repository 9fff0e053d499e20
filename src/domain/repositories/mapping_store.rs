//! Store trait for short identifier mappings.

use crate::domain::entities::{Mapping, NewMapping};
use async_trait::async_trait;

/// Errors reported by a [`MappingStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The short identifier is already used by another mapping.
    #[error("short id `{0}` is already taken")]
    ShortIdTaken(String),

    /// The long URL already has a mapping; carries the existing row.
    #[error("long url is already mapped to `{}`", .0.short_id)]
    LongUrlMapped(Mapping),

    #[error("no mapping for short id `{0}`")]
    NotFound(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Persistent table of mappings.
///
/// Every operation is atomic with respect to every other operation on the
/// same store, and each mutation is committed before the call returns.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteMappingStore`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Exact-match lookup by long URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on database errors.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Mapping>, StoreError>;

    /// Exact-match lookup by short identifier.
    ///
    /// Does not filter by expiry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on database errors.
    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<Mapping>, StoreError>;

    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShortIdTaken`] if the identifier exists.
    /// Returns [`StoreError::LongUrlMapped`] if the long URL already has a mapping.
    /// Returns [`StoreError::Persistence`] on database errors.
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError>;

    /// Sets a new expiry on an existing mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no mapping has this identifier.
    /// Returns [`StoreError::Persistence`] on database errors.
    async fn extend_expiration(&self, short_id: &str, expires_at: i64) -> Result<(), StoreError>;

    /// Deletes every mapping with `expires_at <= now` and returns how many
    /// rows were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on database errors.
    async fn purge_expired(&self, now: i64) -> Result<u64, StoreError>;

    /// Total number of stored mappings, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on database errors.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Number of mappings that a purge at `now` would remove.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on database errors.
    async fn count_expired(&self, now: i64) -> Result<i64, StoreError>;
}
