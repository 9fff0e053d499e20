//! Application error type and its HTTP representation.
//!
//! Every response, successful or not, uses the same JSON envelope:
//!
//! ```json
//! { "code": "-2", "msg": "404 Not Found." }
//! ```
//!
//! Policy rejections and misses are ordinary outcomes and are answered with
//! HTTP 200; only malformed requests (400) and internal faults (500) change
//! the status line.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use validator::ValidationErrors;

use crate::api::dto::envelope::ApiResponse;

/// Status codes carried in the `code` field of every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Ok,
    NotAllowed,
    NotFound,
    InvalidRequest,
    ExtendFailed,
    LookupFailed,
    CreateFailed,
    DecodeFailed,
    RedirectFailed,
    InvalidTarget,
}

impl ResponseCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "200",
            Self::NotAllowed => "-1",
            Self::NotFound => "-2",
            Self::InvalidRequest => "-3",
            Self::ExtendFailed => "-4",
            Self::LookupFailed => "-5",
            Self::CreateFailed => "-6",
            Self::DecodeFailed => "-7",
            Self::RedirectFailed => "-8",
            Self::InvalidTarget => "-9",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum AppError {
    /// The URL's host is not in the allowlist.
    NotAllowed { message: String },
    /// Unknown short identifier.
    NotFound { message: String },
    /// Unparseable body or URL.
    InvalidRequest { message: String },
    /// A stored URL that cannot be used as a redirect target.
    InvalidTarget { message: String },
    /// Persistence fault, tagged with the stage that failed.
    Internal { code: ResponseCode, message: String },
}

impl AppError {
    pub fn not_allowed() -> Self {
        Self::NotAllowed {
            message: "The URL to be processed is not included in allowDomain.".to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self::NotFound {
            message: "404 Not Found.".to_string(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn invalid_target() -> Self {
        Self::InvalidTarget {
            message: "Invalid long URL.".to_string(),
        }
    }

    pub fn internal(code: ResponseCode, message: impl Into<String>) -> Self {
        Self::Internal {
            code,
            message: message.into(),
        }
    }

    /// The envelope code this error is reported with.
    pub fn code(&self) -> ResponseCode {
        match self {
            Self::NotAllowed { .. } => ResponseCode::NotAllowed,
            Self::NotFound { .. } => ResponseCode::NotFound,
            Self::InvalidRequest { .. } => ResponseCode::InvalidRequest,
            Self::InvalidTarget { .. } => ResponseCode::InvalidTarget,
            Self::Internal { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotAllowed { message }
            | Self::NotFound { message }
            | Self::InvalidRequest { message }
            | Self::InvalidTarget { message }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAllowed { .. } | Self::NotFound { .. } => StatusCode::OK,
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidTarget { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiResponse::error(self.code(), self.message());

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        tracing::debug!(%errors, "Request failed validation");
        Self::invalid_request("Invalid request.")
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        Self::invalid_request("Invalid request.")
    }
}
