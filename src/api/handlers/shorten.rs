//! Handler for the shorten endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::envelope::{ApiResponse, UrlData};
use crate::api::dto::shorten::ShortenRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL, or refreshes the expiry of its existing short URL.
///
/// # Endpoint
///
/// `POST /short`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// { "code": "200", "data": { "url": "https://s.example.com/aZ3kP9" } }
/// ```
///
/// # Errors
///
/// - `-1` (HTTP 200) if the host is not allowlisted
/// - `-3` (HTTP 400) if the body or the URL is malformed
/// - `-5`, `-4`, `-6` (HTTP 500) on lookup, extend or create failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UrlData>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let shortened = state.shorten_service.shorten(&payload.url).await?;
    let url = state
        .shorten_service
        .short_url(&shortened.mapping.short_id);

    Ok(Json(ApiResponse::ok(UrlData { url })))
}
