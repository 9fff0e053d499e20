//! Handler for the decode endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::decode::DecodeRequest;
use crate::api::dto::envelope::{ApiResponse, UrlData};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_id::extract_short_id;

/// Returns the long URL behind a short URL.
///
/// # Endpoint
///
/// `POST /decode`
///
/// The identifier is the last path segment of `url`; query, fragment and
/// trailing slashes are ignored. Expired mappings still decode until they
/// are purged.
///
/// # Errors
///
/// - `-2` (HTTP 200) if the identifier is unknown
/// - `-3` (HTTP 400) if no identifier can be extracted
/// - `-7` (HTTP 500) on lookup failure
pub async fn decode_handler(
    State(state): State<AppState>,
    payload: Result<Json<DecodeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UrlData>>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let short_id = extract_short_id(&payload.url)
        .ok_or_else(|| AppError::invalid_request("Invalid request."))?;

    let mapping = state.resolve_service.decode(short_id).await?;

    Ok(Json(ApiResponse::ok(UrlData {
        url: mapping.long_url,
    })))
}
