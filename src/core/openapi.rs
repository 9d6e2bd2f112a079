use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::attendance::{
    dtos as attendance_dtos, handlers as attendance_handlers, models as attendance_models,
};
use crate::features::checkin::{
    dtos as checkin_dtos, handlers as checkin_handlers, models as checkin_models,
};
use crate::features::geofence::Coordinate;
use crate::features::reviewer::{dtos as reviewer_dtos, handlers as reviewer_handlers};
use crate::features::sessions::{
    dtos as sessions_dtos, handlers as sessions_handlers, model as sessions_model,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Sessions
        sessions_handlers::register_claimant,
        sessions_handlers::login_claimant,
        sessions_handlers::register_reviewer,
        sessions_handlers::login_reviewer,
        sessions_handlers::get_session,
        sessions_handlers::logout,
        // Check-in (claimant)
        checkin_handlers::get_checkin_status,
        checkin_handlers::submit_location,
        checkin_handlers::open_camera,
        checkin_handlers::capture_frame,
        checkin_handlers::cancel_checkin,
        // Attendance (claimant)
        attendance_handlers::get_my_attendance,
        // Reviewer
        reviewer_handlers::get_stats,
        reviewer_handlers::list_records,
        reviewer_handlers::export_records,
    ),
    components(
        schemas(
            Meta,
            Coordinate,
            // Sessions
            sessions_model::SessionRole,
            sessions_model::ReviewerProfile,
            sessions_dtos::RegisterClaimantDto,
            sessions_dtos::RegisterReviewerDto,
            sessions_dtos::LoginDto,
            sessions_dtos::SessionProfileDto,
            sessions_dtos::SessionResponseDto,
            ApiResponse<sessions_dtos::SessionResponseDto>,
            ApiResponse<sessions_dtos::SessionProfileDto>,
            // Attendance
            attendance_models::CohortYear,
            attendance_models::ProgramLevel,
            attendance_models::Department,
            attendance_models::AttendanceStatus,
            attendance_models::SubjectProfile,
            attendance_dtos::AttendanceRecordDto,
            attendance_dtos::AttendanceHistoryDto,
            ApiResponse<attendance_dtos::AttendanceRecordDto>,
            ApiResponse<attendance_dtos::AttendanceHistoryDto>,
            ApiResponse<Vec<attendance_dtos::AttendanceRecordDto>>,
            // Check-in
            checkin_models::CheckInPhase,
            checkin_dtos::SubmitLocationDto,
            checkin_dtos::OpenCameraDto,
            checkin_dtos::CaptureFrameDto,
            checkin_dtos::CheckInStatusDto,
            ApiResponse<checkin_dtos::CheckInStatusDto>,
            // Reviewer
            reviewer_dtos::ReviewStatsDto,
            ApiResponse<reviewer_dtos::ReviewStatsDto>,
        )
    ),
    tags(
        (name = "sessions", description = "Claimant and reviewer sessions"),
        (name = "checkin", description = "Geofenced check-in with face capture (claimant)"),
        (name = "attendance", description = "Own attendance history (claimant)"),
        (name = "reviewer", description = "Department attendance dashboard and export (reviewer)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Presence API",
        version = "0.1.0",
        description = "Geofenced attendance check-in and reviewer dashboard",
    )
)]
pub struct ApiDoc;

/// Adds the session bearer token scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("UUID")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
