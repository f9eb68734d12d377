//! Helpers shared by the endpoint handlers.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use rand::Rng;
use tracing::error;

use crate::identity::{AuthenticatedUser, IdentityError};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Pulls the bearer token out of the `Authorization` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authenticates the caller from the `Authorization` header.
pub async fn authenticate(
    state: &Arc<AppState>,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, IdentityError> {
    let token = bearer_token(headers).ok_or(IdentityError::MissingToken)?;
    state.identity.verify_token(token).await
}

/// Converts an IdentityError to an API response.
///
/// Credential problems are the caller's to fix; provider outages are
/// reported as a dependency failure, never as a rejected login.
pub fn identity_error_to_response(error: IdentityError) -> Response {
    if error.is_auth_failure() {
        let (code, message) = match &error {
            IdentityError::MissingToken => ("auth_required", "Missing authorization header"),
            _ => ("auth_invalid", "Invalid or expired credentials"),
        };
        return ApiErrorType::new(StatusCode::BAD_REQUEST, code, message).into_response();
    }

    error!("Identity provider failure: {error}");
    ApiErrorType::new(
        StatusCode::BAD_GATEWAY,
        "dependency",
        "Could not verify credentials. Please retry.",
    )
    .into_response()
}

/// Generates a unique correlation ID for request tracing.
pub fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
