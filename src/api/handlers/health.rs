//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::domain::repositories::MappingStore;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 42 mappings" },
///     "reaper": { "status": "ok", "message": "Running" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let reaper = check_reaper(&state);

    let all_healthy = database.is_ok() && reaper.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database, reaper },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks database connectivity by counting mappings.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.store.count().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} mappings")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

fn check_reaper(state: &AppState) -> CheckStatus {
    if state.reaper.is_cancelled() {
        CheckStatus::error("Reaper stopped")
    } else if !state.reaper.is_alive() {
        CheckStatus::error("Reaper exited unexpectedly")
    } else {
        CheckStatus::ok("Running")
    }
}
