//! Session booking endpoints.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::booking::{self, BookingError, BookingRequest};
use crate::server::types::ApiErrorType;
use crate::server::util;
use crate::types::AppState;

/// Converts a BookingError to an API response.
fn booking_error_to_response(error: BookingError) -> Response {
    if let BookingError::Storage(e) = &error {
        error!("Booking storage failure: {e}");
        return ApiErrorType::new(
            StatusCode::BAD_GATEWAY,
            error.code(),
            "Could not save the booking. Please retry.",
        )
        .into_response();
    }
    ApiErrorType::new(StatusCode::BAD_REQUEST, error.code(), error.to_string()).into_response()
}

/// POST /bookings
///
/// Books a coaching session in the requested slot. Rejected when a
/// non-cancelled booking already occupies `(sessionDate, sessionTime)`.
pub async fn post_create_booking(
    State(s): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<BookingRequest>,
) -> Response {
    let correlation_id = util::generate_correlation_id();
    info!(correlation_id = %correlation_id, "POST /bookings");

    let user = match util::authenticate(&s, &headers).await {
        Ok(user) => user,
        Err(e) => {
            warn!(correlation_id = %correlation_id, "Booking auth failed: {e}");
            return util::identity_error_to_response(e);
        }
    };

    match booking::create_booking(&s.db, &user.id, &payload, chrono::Utc::now()) {
        Ok(created) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "booking": created,
                "message": "Session booked successfully",
            })),
        )
            .into_response(),
        Err(e) => {
            warn!(correlation_id = %correlation_id, code = e.code(), "Booking rejected: {e}");
            booking_error_to_response(e)
        }
    }
}

/// POST /bookings/:id/cancel
///
/// Cancels one of the caller's own bookings, freeing its slot.
pub async fn post_cancel_booking(
    State(s): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let user = match util::authenticate(&s, &headers).await {
        Ok(user) => user,
        Err(e) => return util::identity_error_to_response(e),
    };

    match s.db.cancel_booking(booking_id, &user.id) {
        Ok(true) => {
            info!(booking_id, "Cancelled booking");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Booking cancelled",
                })),
            )
                .into_response()
        }
        Ok(false) => ApiErrorType::new(
            StatusCode::NOT_FOUND,
            "not_found",
            "No active booking with that id",
        )
        .into_response(),
        Err(e) => {
            error!("Failed to cancel booking: {e}");
            ApiErrorType::new(
                StatusCode::BAD_GATEWAY,
                "dependency",
                "Could not cancel the booking. Please retry.",
            )
            .into_response()
        }
    }
}

/// GET /bookings
///
/// Lists the caller's bookings, newest first.
pub async fn get_my_bookings(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let user = match util::authenticate(&s, &headers).await {
        Ok(user) => user,
        Err(e) => return util::identity_error_to_response(e),
    };

    match s.db.bookings_for_user(&user.id) {
        Ok(bookings) => (StatusCode::OK, Json(json!({ "bookings": bookings }))).into_response(),
        Err(e) => {
            error!("Failed to list bookings: {e}");
            ApiErrorType::new(
                StatusCode::BAD_GATEWAY,
                "dependency",
                "Could not load bookings. Please retry.",
            )
            .into_response()
        }
    }
}
