//! Core domain entities.
//!
//! The service has a single entity, [`Mapping`], plus [`NewMapping`] used as
//! the input for creating one.

pub mod mapping;

pub use mapping::{Mapping, NewMapping};
