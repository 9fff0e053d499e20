#![allow(dead_code)]

use expiring_shortener::application::services::ShortenPolicy;
use expiring_shortener::domain::reaper::ReaperStatus;
use expiring_shortener::infrastructure::persistence::SqliteMappingStore;
use expiring_shortener::state::AppState;
use expiring_shortener::utils::allowlist::AllowList;
use expiring_shortener::utils::clock::ManualClock;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const START: i64 = 1_700_000_000;
pub const TTL: i64 = 100;
pub const HOST: &str = "http://s.test";

pub fn test_policy() -> ShortenPolicy {
    ShortenPolicy {
        allow_list: AllowList::new(["example.com"]),
        ttl_seconds: TTL,
        short_length: 6,
        max_attempts: 10,
        public_host: HOST.to_string(),
    }
}

pub async fn insert_mapping(pool: &SqlitePool, id: &str, url: &str, expires_at: i64) {
    sqlx::query("INSERT INTO url_mapping (id, long_url, expires_at) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(url)
        .bind(expires_at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_mappings(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM url_mapping")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn expires_at(pool: &SqlitePool, id: &str) -> i64 {
    sqlx::query_scalar("SELECT expires_at FROM url_mapping WHERE id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// State over `pool` with a clock pinned at [`START`] and a live reaper status.
pub fn create_test_state(pool: SqlitePool) -> (AppState, Arc<ManualClock>) {
    let store = Arc::new(SqliteMappingStore::new(Arc::new(pool)));
    let clock = Arc::new(ManualClock::new(START));

    let state = AppState::new(store, test_policy(), clock.clone(), ReaperStatus::new());

    (state, clock)
}
