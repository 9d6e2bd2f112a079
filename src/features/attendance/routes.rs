use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::attendance::handlers;
use crate::features::attendance::services::AttendanceLedger;

/// Create routes for the attendance feature
///
/// Protected routes require the session middleware to be applied by caller
pub fn routes(ledger: Arc<AttendanceLedger>) -> Router {
    Router::new()
        .route("/api/attendance/me", get(handlers::get_my_attendance))
        .with_state(ledger)
}
