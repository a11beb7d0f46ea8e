use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tax_core::TaxError;

pub const MISSING_FIELDS: &str = "Missing required fields: 'income' and 'year'";

/// An error response rendered as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn missing_fields() -> Self {
        Self::bad_request(MISSING_FIELDS)
    }

    pub fn timed_out(after: Duration) -> Self {
        Self {
            status: StatusCode::REQUEST_TIMEOUT,
            message: format!("request timed out after {after:?}"),
        }
    }
}

/// Input rejections are the caller's fault (400); a failed bracket
/// fetch is the schedule service's (502).
impl From<TaxError> for ApiError {
    fn from(err: TaxError) -> Self {
        if err.is_rejection() {
            Self::bad_request(err.to_string())
        } else {
            Self {
                status: StatusCode::BAD_GATEWAY,
                message: format!("Error calculating tax: {err}"),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
