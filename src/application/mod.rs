//! Application layer services implementing business logic.
//!
//! Services consume the [`MappingStore`](crate::domain::repositories::MappingStore)
//! trait and give HTTP handlers a small API that already speaks in
//! [`AppError`](crate::error::AppError) terms.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Shortening, collision retry and expiry refresh
//! - [`services::resolve_service::ResolveService`] - Decode and redirect lookups

pub mod services;
