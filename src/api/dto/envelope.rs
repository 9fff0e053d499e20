//! Common JSON envelope shared by every endpoint.

use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::error::ResponseCode;

/// `{ "code": "...", "msg": "...", "data": ... }`
///
/// `msg` and `data` are omitted when absent.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: &'static str,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: ResponseCode::Ok.as_str(),
            msg: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(code: ResponseCode, msg: impl Into<String>) -> Self {
        Self {
            code: code.as_str(),
            msg: Some(msg.into()),
            data: None,
        }
    }
}

/// Payload of successful shorten and decode responses.
#[derive(Debug, Serialize)]
pub struct UrlData {
    pub url: String,
}
