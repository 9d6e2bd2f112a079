use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::sessions::handlers;
use crate::features::sessions::services::SessionService;

/// Routes that open a session (no session required)
pub fn public_routes(service: Arc<SessionService>) -> Router {
    Router::new()
        .route(
            "/api/sessions/claimant/register",
            post(handlers::register_claimant),
        )
        .route("/api/sessions/claimant/login", post(handlers::login_claimant))
        .route(
            "/api/sessions/reviewer/register",
            post(handlers::register_reviewer),
        )
        .route("/api/sessions/reviewer/login", post(handlers::login_reviewer))
        .with_state(service)
}

/// Routes on an open session
///
/// Protected routes require the session middleware to be applied by caller
pub fn protected_routes(service: Arc<SessionService>) -> Router {
    Router::new()
        .route("/api/sessions/me", get(handlers::get_session))
        .route("/api/sessions/logout", post(handlers::logout))
        .with_state(service)
}
