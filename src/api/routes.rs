//! API route configuration.

use crate::api::handlers::{decode_handler, health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `POST /short`       - Shorten a URL (or refresh its expiry)
/// - `POST /decode`      - Look up the long URL behind a short URL
/// - `GET  /health`      - Health check: database and reaper
/// - `GET  /{short_id}`  - Redirect to the long URL
///
/// Fixed paths take precedence over `/{short_id}`, which is why the
/// generator never hands out `short`, `decode` or `health`.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/short", post(shorten_handler))
        .route("/decode", post(decode_handler))
        .route("/health", get(health_handler))
        .route("/{short_id}", get(redirect_handler))
}
