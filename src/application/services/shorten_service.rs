//! URL shortening with collision retry and idempotent re-shortening.

use std::sync::Arc;

use tracing::{debug, error, info};
use url::Url;

use crate::config::Config;
use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingStore, StoreError};
use crate::error::{AppError, ResponseCode};
use crate::utils::allowlist::AllowList;
use crate::utils::clock::Clock;
use crate::utils::code_generator::{generate_code, is_reserved};

/// Settings that shape how URLs are shortened.
#[derive(Debug, Clone)]
pub struct ShortenPolicy {
    pub allow_list: AllowList,
    /// Lifetime of a mapping in seconds, applied on create and on re-shorten.
    pub ttl_seconds: i64,
    pub short_length: usize,
    /// Upper bound on create attempts for one shorten call.
    pub max_attempts: usize,
    /// Public base URL that short identifiers are appended to.
    pub public_host: String,
}

impl ShortenPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allow_list: AllowList::new(&config.allow_domain),
            ttl_seconds: config.expire,
            short_length: config.short_length,
            max_attempts: config.short_id_attempts,
            public_host: config.host.clone(),
        }
    }
}

/// Whether a shorten call inserted a row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortenOutcome {
    Created,
    Extended,
}

/// Result of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    /// The mapping as stored after the call.
    pub mapping: Mapping,
    pub outcome: ShortenOutcome,
}

/// Service turning long URLs into short identifiers.
///
/// Shortening the same URL again never creates a second mapping: the
/// existing one keeps its identifier and gets a fresh expiry.
pub struct ShortenService<S: MappingStore> {
    store: Arc<S>,
    policy: ShortenPolicy,
    clock: Arc<dyn Clock>,
}

impl<S: MappingStore> ShortenService<S> {
    /// Creates a new shortening service.
    pub fn new(store: Arc<S>, policy: ShortenPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    /// Shortens `long_url`, or refreshes the expiry of its existing mapping.
    ///
    /// The URL is stored exactly as given.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidRequest`] if `long_url` is not an absolute URL
    /// - [`AppError::NotAllowed`] if its host is not allowlisted; the store is
    ///   not touched
    /// - [`AppError::Internal`] with `-5`, `-4` or `-6` when the lookup, the
    ///   extend or the create fails; `-6` also when `now + ttl` overflows
    pub async fn shorten(&self, long_url: &str) -> Result<Shortened, AppError> {
        let parsed =
            Url::parse(long_url).map_err(|_| AppError::invalid_request("Invalid request."))?;

        if !self.policy.allow_list.permits(&parsed) {
            debug!(host = parsed.host_str(), "Host not in allowlist");
            return Err(AppError::not_allowed());
        }

        let now = self.clock.now();
        let Some(expires_at) = now.checked_add(self.policy.ttl_seconds) else {
            error!(now, ttl_seconds = self.policy.ttl_seconds, "Expiry overflows i64");
            return Err(AppError::internal(
                ResponseCode::CreateFailed,
                "Failed to shorten URL.",
            ));
        };

        let existing = self
            .store
            .find_by_long_url(long_url)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up long URL");
                AppError::internal(ResponseCode::LookupFailed, "Failed to query database.")
            })?;

        if let Some(existing) = existing
            && let Some(shortened) = self.extend_existing(existing, expires_at).await?
        {
            return Ok(shortened);
        }

        self.create_new(long_url, expires_at).await
    }

    /// Builds the public short URL for an identifier.
    pub fn short_url(&self, short_id: &str) -> String {
        format!(
            "{}/{}",
            self.policy.public_host.trim_end_matches('/'),
            short_id
        )
    }

    /// Draws identifiers until one is accepted by the store.
    ///
    /// Each attempt is one `create` call; reserved draws are discarded
    /// without using up an attempt.
    async fn create_new(&self, long_url: &str, expires_at: i64) -> Result<Shortened, AppError> {
        for attempt in 1..=self.policy.max_attempts {
            let short_id = draw_candidate(self.policy.short_length);

            let new_mapping = NewMapping {
                short_id,
                long_url: long_url.to_string(),
                expires_at,
            };

            match self.store.create(new_mapping).await {
                Ok(mapping) => {
                    info!(short_id = %mapping.short_id, expires_at, "Created mapping");
                    return Ok(Shortened {
                        mapping,
                        outcome: ShortenOutcome::Created,
                    });
                }
                Err(StoreError::ShortIdTaken(short_id)) => {
                    debug!(attempt, %short_id, "Short id collision, drawing again");
                }
                Err(StoreError::LongUrlMapped(existing)) => {
                    // Another request mapped this URL since our lookup.
                    if let Some(shortened) = self.extend_existing(existing, expires_at).await? {
                        return Ok(shortened);
                    }
                }
                Err(e) => {
                    error!(error = %e, "Failed to create mapping");
                    return Err(AppError::internal(
                        ResponseCode::CreateFailed,
                        "Failed to shorten URL.",
                    ));
                }
            }
        }

        error!(
            attempts = self.policy.max_attempts,
            short_length = self.policy.short_length,
            "Could not find a free short id; shortLength may be too small"
        );
        Err(AppError::internal(
            ResponseCode::CreateFailed,
            "Failed to shorten URL.",
        ))
    }

    /// Moves the expiry of `existing` to `expires_at`.
    ///
    /// Returns `Ok(None)` when the row vanished in between (purged), so the
    /// caller can fall back to creating a new mapping.
    async fn extend_existing(
        &self,
        mut existing: Mapping,
        expires_at: i64,
    ) -> Result<Option<Shortened>, AppError> {
        match self
            .store
            .extend_expiration(&existing.short_id, expires_at)
            .await
        {
            Ok(()) => {
                debug!(short_id = %existing.short_id, expires_at, "Extended mapping");
                existing.expires_at = expires_at;
                Ok(Some(Shortened {
                    mapping: existing,
                    outcome: ShortenOutcome::Extended,
                }))
            }
            Err(StoreError::NotFound(short_id)) => {
                debug!(%short_id, "Mapping purged before it could be extended");
                Ok(None)
            }
            Err(e) => {
                error!(short_id = %existing.short_id, error = %e, "Failed to extend mapping");
                Err(AppError::internal(
                    ResponseCode::ExtendFailed,
                    "Failed to extend URL expiration.",
                ))
            }
        }
    }
}

/// Draws an identifier that is not reserved.
fn draw_candidate(length: usize) -> String {
    loop {
        let short_id = generate_code(length);
        if !is_reserved(&short_id) {
            return short_id;
        }
    }
}
