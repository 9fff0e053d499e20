//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short identifier to its long URL.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// Answers `302 Found` with the stored URL in `Location`. Expiry is not
/// checked here; an expired mapping redirects until the reaper removes it.
///
/// # Errors
///
/// - `-2` (HTTP 200) if the identifier is unknown
/// - `-8` (HTTP 500) on lookup failure
/// - `-9` (HTTP 500) if the stored URL cannot be used as a redirect target
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target = state.resolve_service.redirect_target(&short_id).await?;

    let location = HeaderValue::try_from(target).map_err(|_| AppError::invalid_target())?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
