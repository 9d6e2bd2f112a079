use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::checkin::handlers;
use crate::features::checkin::services::CheckInService;

/// Create routes for the check-in feature
///
/// Protected routes require the session middleware to be applied by caller
pub fn routes(service: Arc<CheckInService>) -> Router {
    Router::new()
        .route("/api/checkin", get(handlers::get_checkin_status))
        .route("/api/checkin/location", post(handlers::submit_location))
        .route("/api/checkin/camera", post(handlers::open_camera))
        .route("/api/checkin/capture", post(handlers::capture_frame))
        .route("/api/checkin/cancel", post(handlers::cancel_checkin))
        .with_state(service)
}
