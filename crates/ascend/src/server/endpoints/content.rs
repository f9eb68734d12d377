//! Content access listing.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::access;
use crate::server::types::ApiErrorType;
use crate::server::util;
use crate::types::AppState;

/// GET /content
///
/// Returns every catalog item with the caller's access verdict: viewable,
/// locked behind a tier upgrade, or locked until its release week (with the
/// release date and countdown attached).
pub async fn get_content_access(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let user = match util::authenticate(&s, &headers).await {
        Ok(user) => user,
        Err(e) => return util::identity_error_to_response(e),
    };

    let now = chrono::Utc::now();
    let profile = match s.db.get_or_create_profile(&user.id, now) {
        Ok(profile) => profile,
        Err(e) => {
            error!("Failed to load member profile: {e}");
            return ApiErrorType::new(
                StatusCode::BAD_GATEWAY,
                "dependency",
                "Could not load your profile. Please retry.",
            )
            .into_response();
        }
    };

    let items: Vec<_> = s
        .catalog
        .items()
        .iter()
        .map(|item| {
            let decision =
                access::decide(profile.subscription_tier, item, profile.enrolled_at, now);
            json!({
                "id": item.id,
                "title": item.title,
                "description": item.description,
                "weekNumber": item.week_number,
                "requiredTier": item.required_tier,
                "access": decision,
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "currentWeek": access::current_week(profile.enrolled_at, now),
            "subscriptionTier": profile.subscription_tier,
            "items": items,
        })),
    )
        .into_response()
}
