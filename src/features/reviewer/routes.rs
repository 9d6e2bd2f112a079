use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::reviewer::handlers;
use crate::features::reviewer::services::ReviewService;

/// Create routes for the reviewer feature
///
/// Protected routes require the session middleware to be applied by caller
pub fn routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route("/api/reviewer/stats", get(handlers::get_stats))
        .route("/api/reviewer/records", get(handlers::list_records))
        .route("/api/reviewer/export", get(handlers::export_records))
        .with_state(service)
}
