use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware as mw, Router};

use crate::server::endpoints::{booking, content, status, trial};
use crate::types::AppState;

mod endpoints;
mod middleware;
mod types;
mod util;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Endpoints acting on behalf of an authenticated member
    let member_router = Router::new()
        .route(
            "/bookings",
            post(booking::post_create_booking).get(booking::get_my_bookings),
        )
        .route("/bookings/:id/cancel", post(booking::post_cancel_booking))
        .route("/trial", get(trial::get_trial_status))
        .route("/content", get(content::get_content_access));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(member_router)
        // CORS wraps the whole router; OPTIONS preflights never reach routing
        .layer(mw::from_fn(middleware::cors::allow_all))
        .with_state(app_state)
}
