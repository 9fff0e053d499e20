//! Utility functions for identifier generation, URL handling and time.
//!
//! - [`code_generator`] - Short identifier generation
//! - [`allowlist`] - Host allowlist applied before shortening
//! - [`short_id`] - Short identifier extraction from submitted URLs
//! - [`clock`] - Epoch-seconds time source
//! - [`db_error`] - SQLx error classification

pub mod allowlist;
pub mod clock;
pub mod code_generator;
pub mod db_error;
pub mod short_id;
