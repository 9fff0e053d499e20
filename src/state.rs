//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::application::services::{ResolveService, ShortenPolicy, ShortenService};
use crate::domain::reaper::ReaperStatus;
use crate::infrastructure::persistence::SqliteMappingStore;
use crate::utils::clock::Clock;

pub type AppShortenService = ShortenService<SqliteMappingStore>;
pub type AppResolveService = ResolveService<SqliteMappingStore>;

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<AppShortenService>,
    pub resolve_service: Arc<AppResolveService>,
    /// Used directly only by the health check.
    pub store: Arc<SqliteMappingStore>,
    /// Liveness of the background reaper, read by the health check.
    pub reaper: ReaperStatus,
}

impl AppState {
    /// Wires both services over one store.
    pub fn new(
        store: Arc<SqliteMappingStore>,
        policy: ShortenPolicy,
        clock: Arc<dyn Clock>,
        reaper: ReaperStatus,
    ) -> Self {
        Self {
            shorten_service: Arc::new(ShortenService::new(store.clone(), policy, clock)),
            resolve_service: Arc::new(ResolveService::new(store.clone())),
            store,
            reaper,
        }
    }
}
