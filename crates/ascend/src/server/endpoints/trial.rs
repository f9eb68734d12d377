//! Trial status endpoint.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::server::types::ApiErrorType;
use crate::server::util;
use crate::types::AppState;

/// GET /trial
///
/// Returns the caller's trial window and its derived state, creating the
/// window on first check. A failed read is reported as unknown — never
/// defaulted to active or expired.
pub async fn get_trial_status(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let user = match util::authenticate(&s, &headers).await {
        Ok(user) => user,
        Err(e) => return util::identity_error_to_response(e),
    };

    let now = chrono::Utc::now();
    match s.db.get_or_create_trial(&user.id, now) {
        Ok(trial) => (
            StatusCode::OK,
            Json(json!({
                "status": if trial.is_active(now) { "active" } else { "expired" },
                "isInTrial": trial.is_active(now),
                "hasTrialExpired": trial.has_expired(now),
                "trialStartDate": trial.started_at,
                "trialEndDate": trial.ends_at,
                "daysLeft": trial.days_left(now),
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to read trial state: {e}");
            ApiErrorType::new(
                StatusCode::BAD_GATEWAY,
                "dependency",
                "Trial status unknown. Please retry.",
            )
            .into_response()
        }
    }
}
