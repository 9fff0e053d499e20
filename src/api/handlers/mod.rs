//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to one route.

pub mod decode;
pub mod health;
pub mod redirect;
pub mod shorten;

pub use decode::decode_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
