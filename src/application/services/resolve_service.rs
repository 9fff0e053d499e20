//! Short identifier resolution for decode and redirect.

use std::sync::Arc;

use tracing::{error, warn};
use url::Url;

use crate::domain::entities::Mapping;
use crate::domain::repositories::MappingStore;
use crate::error::{AppError, ResponseCode};

/// Read-only service mapping short identifiers back to long URLs.
///
/// Lookups do not check expiry; a mapping resolves until the reaper
/// removes it.
pub struct ResolveService<S: MappingStore> {
    store: Arc<S>,
}

impl<S: MappingStore> ResolveService<S> {
    /// Creates a new resolution service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the mapping stored under `short_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping exists.
    /// Returns [`AppError::Internal`] (`-7`) on persistence errors.
    pub async fn decode(&self, short_id: &str) -> Result<Mapping, AppError> {
        self.store
            .find_by_short_id(short_id)
            .await
            .map_err(|e| {
                error!(%short_id, error = %e, "Failed to decode short id");
                AppError::internal(ResponseCode::DecodeFailed, "Failed to decode URL.")
            })?
            .ok_or_else(AppError::not_found)
    }

    /// Returns the stored URL a request for `short_id` should be redirected
    /// to, after checking that it is usable as one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping exists.
    /// Returns [`AppError::Internal`] (`-8`) on persistence errors.
    /// Returns [`AppError::InvalidTarget`] if the stored URL is not an
    /// absolute URL with a host.
    pub async fn redirect_target(&self, short_id: &str) -> Result<String, AppError> {
        let mapping = self
            .store
            .find_by_short_id(short_id)
            .await
            .map_err(|e| {
                error!(%short_id, error = %e, "Failed to resolve redirect");
                AppError::internal(ResponseCode::RedirectFailed, "Failed to redirect URL.")
            })?
            .ok_or_else(AppError::not_found)?;

        match Url::parse(&mapping.long_url) {
            Ok(url) if url.has_host() => Ok(mapping.long_url),
            _ => {
                warn!(%short_id, long_url = %mapping.long_url, "Stored URL is not a valid redirect target");
                Err(AppError::invalid_target())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockMappingStore, StoreError};

    fn store_with(long_url: &'static str) -> MockMappingStore {
        let mut store = MockMappingStore::new();
        store
            .expect_find_by_short_id()
            .withf(|id| id == "abc123")
            .times(1)
            .returning(move |id| Ok(Some(Mapping::new(id.to_string(), long_url.to_string(), 0))));
        store
    }

    fn empty_store() -> MockMappingStore {
        let mut store = MockMappingStore::new();
        store
            .expect_find_by_short_id()
            .times(1)
            .returning(|_| Ok(None));
        store
    }

    fn failing_store() -> MockMappingStore {
        let mut store = MockMappingStore::new();
        store
            .expect_find_by_short_id()
            .times(1)
            .returning(|_| Err(StoreError::Persistence(sqlx::Error::PoolTimedOut)));
        store
    }

    #[tokio::test]
    async fn test_decode_returns_stored_url_verbatim() {
        let service = ResolveService::new(Arc::new(store_with("https://Example.com/a?b=1")));

        let mapping = service.decode("abc123").await.unwrap();
        assert_eq!(mapping.long_url, "https://Example.com/a?b=1");
    }

    #[tokio::test]
    async fn test_decode_expired_mapping_still_resolves() {
        // expires_at = 0 is long past
        let service = ResolveService::new(Arc::new(store_with("https://example.com/a")));
        assert!(service.decode("abc123").await.is_ok());
    }

    #[tokio::test]
    async fn test_decode_miss_and_fault() {
        let service = ResolveService::new(Arc::new(empty_store()));
        let err = service.decode("nope").await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::NotFound);

        let service = ResolveService::new(Arc::new(failing_store()));
        let err = service.decode("abc123").await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::DecodeFailed);
    }

    #[tokio::test]
    async fn test_redirect_target_ok() {
        let service = ResolveService::new(Arc::new(store_with("https://example.com/a")));

        let target = service.redirect_target("abc123").await.unwrap();
        assert_eq!(target, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_redirect_target_rejects_hostless_url() {
        let service = ResolveService::new(Arc::new(store_with("javascript:alert(1)")));

        let err = service.redirect_target("abc123").await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::InvalidTarget);
    }

    #[tokio::test]
    async fn test_redirect_target_rejects_relative_url() {
        let service = ResolveService::new(Arc::new(store_with("/just/a/path")));

        let err = service.redirect_target("abc123").await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::InvalidTarget);
    }

    #[tokio::test]
    async fn test_redirect_target_miss_and_fault() {
        let service = ResolveService::new(Arc::new(empty_store()));
        let err = service.redirect_target("nope").await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::NotFound);

        let service = ResolveService::new(Arc::new(failing_store()));
        let err = service.redirect_target("abc123").await.unwrap_err();
        assert_eq!(err.code(), ResponseCode::RedirectFailed);
    }
}
