//! Domain layer: entities, the store contract and the expiration reaper.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`reaper`] - Background purge of expired mappings
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; the store trait is implemented in `crate::infrastructure`.

pub mod entities;
pub mod reaper;
pub mod repositories;
