//! Response types shared by the API endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// JSON error envelope: `{"success": false, "error": ..., "code": ...}`.
///
/// `code` is the machine-readable discriminator; `error` is the user-facing
/// text.
pub struct ApiErrorType {
    status: StatusCode,
    code: &'static str,
    error: String,
}

impl ApiErrorType {
    pub fn new(status: StatusCode, code: &'static str, error: impl Into<String>) -> Self {
        Self {
            status,
            code,
            error: error.into(),
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "success": false,
                "error": self.error,
                "code": self.code,
            })),
        )
            .into_response()
    }
}
