//! # Expiring Shortener
//!
//! A small URL shortening service with expiring links, built with Axum and SQLite.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The mapping entity, the store trait and the expiration reaper
//! - **Application Layer** ([`application`]) - Shortening and resolution services
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence and migrations
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs and middleware
//!
//! ## Behaviour
//!
//! - Only URLs whose host is in `allowDomain` are shortened
//! - Shortening a known URL returns its existing short id and resets its expiry
//! - Expired mappings keep resolving until the reaper purges them
//!
//! ## Quick Start
//!
//! ```bash
//! cp config.example.yaml config.yaml
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from a YAML file via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ResolveService, ShortenPolicy, ShortenService};
    pub use crate::domain::entities::{Mapping, NewMapping};
    pub use crate::domain::repositories::{MappingStore, StoreError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::SqliteMappingStore;
    pub use crate::state::AppState;
}
