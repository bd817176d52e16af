use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shub_derive::api_model;

pub use shub_domain::constants::INTERNAL_MESSAGE;

/// Error envelope returned by every slice: `{ "error": { status, name, message } }`.
#[api_model]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[api_model]
pub struct ErrorDetail {
    /// HTTP status code
    pub status: u16,
    /// Error kind, e.g. `ValidationFailed`
    pub name: String,
    /// Client-safe description
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                status: status.as_u16(),
                name: name.into(),
                message: message.into(),
            },
        }
    }

    /// Renders the envelope with `status`.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
