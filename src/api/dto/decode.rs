//! DTOs for the decode endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request to decode a short URL back to its original.
///
/// Only the final path segment of `url` is used, so both a bare identifier
/// and a full short URL are accepted.
#[derive(Debug, Deserialize, Validate)]
pub struct DecodeRequest {
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: String,
}
