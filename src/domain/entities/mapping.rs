//! Mapping entity linking a short identifier to a long URL.

use chrono::{DateTime, Utc};

/// A persisted `(short_id, long_url, expires_at)` triple.
///
/// `expires_at` is an epoch-seconds timestamp. Mappings are expired lazily:
/// a mapping past its expiry still resolves until the reaper purges it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Mapping {
    #[sqlx(rename = "id")]
    pub short_id: String,
    pub long_url: String,
    pub expires_at: i64,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(short_id: String, long_url: String, expires_at: i64) -> Self {
        Self {
            short_id,
            long_url,
            expires_at,
        }
    }

    /// Returns true if the mapping is eligible for purge at `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Expiry as a UTC timestamp, if it is within chrono's range.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }
}

/// Input data for creating a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub short_id: String,
    pub long_url: String,
    pub expires_at: i64,
}

impl From<NewMapping> for Mapping {
    fn from(new_mapping: NewMapping) -> Self {
        Self::new(
            new_mapping.short_id,
            new_mapping.long_url,
            new_mapping.expires_at,
        )
    }
}
