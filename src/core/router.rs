use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};

use crate::core::config::Config;
use crate::core::middleware;
use crate::features::attendance::{routes as attendance_routes, AttendanceLedger};
use crate::features::checkin::providers::{FaceVerifier, FrameRelay};
use crate::features::checkin::{routes as checkin_routes, CheckInContext, CheckInService};
use crate::features::geofence::GeofenceService;
use crate::features::reviewer::{routes as reviewer_routes, ReviewService};
use crate::features::sessions::{routes as sessions_routes, SessionService};

/// Services shared by all requests
pub struct AppServices {
    pub ledger: Arc<AttendanceLedger>,
    pub checkin: Arc<CheckInService>,
    pub sessions: Arc<SessionService>,
    pub review: Arc<ReviewService>,
}

impl AppServices {
    pub fn from_config(config: &Config) -> Self {
        let geofence = Arc::new(GeofenceService::new(&config.geofence));
        tracing::info!(
            "Geofence anchored at {} with radius {}m",
            geofence.anchor(),
            geofence.radius_meters()
        );

        let verifier: Arc<dyn FaceVerifier> = Arc::from(config.verifier.build());
        tracing::info!(
            "Face verifier: {:?} (delay={}ms, p={})",
            config.verifier.mode,
            config.verifier.processing_delay.as_millis(),
            config.verifier.success_probability
        );

        let context = CheckInContext {
            geofence,
            verifier,
            ledger: Arc::new(AttendanceLedger::new()),
            location_request: (&config.location).into(),
            stream_request: (&config.capture).into(),
        };
        Self::new(context)
    }

    /// Wire every service around the ledger of `context`
    pub fn new(context: CheckInContext) -> Self {
        let ledger = Arc::clone(&context.ledger);
        let checkin = Arc::new(CheckInService::new(context, Arc::new(FrameRelay::new())));
        let sessions = Arc::new(SessionService::new(Arc::clone(&checkin)));
        let review = Arc::new(ReviewService::new(Arc::clone(&ledger)));

        Self {
            ledger,
            checkin,
            sessions,
            review,
        }
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// API routes: public session routes, session-protected feature routes and `/health`
pub fn api_router(services: &AppServices) -> Router {
    let protected_routes = Router::new()
        .merge(sessions_routes::protected_routes(Arc::clone(
            &services.sessions,
        )))
        .merge(checkin_routes::routes(Arc::clone(&services.checkin)))
        .merge(attendance_routes::routes(Arc::clone(&services.ledger)))
        .merge(reviewer_routes::routes(Arc::clone(&services.review)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&services.sessions),
            middleware::session_middleware,
        ));

    let public_routes = Router::new()
        .merge(sessions_routes::public_routes(Arc::clone(&services.sessions)))
        .route("/health", get(health_check));

    Router::new().merge(protected_routes).merge(public_routes)
}
