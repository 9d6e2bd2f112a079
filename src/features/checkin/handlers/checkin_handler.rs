use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::attendance::dtos::AttendanceRecordDto;
use crate::features::checkin::dtos::{
    CaptureFrameDto, CheckInStatusDto, OpenCameraDto, SubmitLocationDto,
};
use crate::features::checkin::services::CheckInService;
use crate::features::sessions::guards::RequireClaimant;
use crate::shared::types::ApiResponse;

/// Get the current check-in attempt
#[utoipa::path(
    get,
    path = "/api/checkin",
    responses(
        (status = 200, description = "Current attempt state", body = ApiResponse<CheckInStatusDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a claimant session")
    ),
    security(("bearer_auth" = [])),
    tag = "checkin"
)]
pub async fn get_checkin_status(
    RequireClaimant(session): RequireClaimant,
    State(service): State<Arc<CheckInService>>,
) -> Result<Json<ApiResponse<CheckInStatusDto>>> {
    let status = service.status(&session.checkin);
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}

/// Start a check-in attempt with the device's location
///
/// The coordinate must fall inside the geofence before the camera can be activated.
#[utoipa::path(
    post,
    path = "/api/checkin/location",
    request_body = SubmitLocationDto,
    responses(
        (status = 200, description = "Location verified", body = ApiResponse<CheckInStatusDto>),
        (status = 400, description = "Missing coordinate"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "An attempt is already in progress"),
        (status = 422, description = "Location unavailable or outside the geofence")
    ),
    security(("bearer_auth" = [])),
    tag = "checkin"
)]
pub async fn submit_location(
    RequireClaimant(session): RequireClaimant,
    State(service): State<Arc<CheckInService>>,
    AppJson(dto): AppJson<SubmitLocationDto>,
) -> Result<Json<ApiResponse<CheckInStatusDto>>> {
    let location = dto.into_reported()?;
    let verdict = service.submit_location(&session.checkin, location).await?;

    Ok(Json(ApiResponse::success(
        Some(service.status(&session.checkin)),
        Some(format!(
            "Location verified! Distance: {:.0}m",
            verdict.distance_m
        )),
        None,
    )))
}

/// Activate the camera after a verified location
#[utoipa::path(
    post,
    path = "/api/checkin/camera",
    request_body = OpenCameraDto,
    responses(
        (status = 200, description = "Camera active", body = ApiResponse<CheckInStatusDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Camera access denied"),
        (status = 409, description = "Location not verified")
    ),
    security(("bearer_auth" = [])),
    tag = "checkin"
)]
pub async fn open_camera(
    RequireClaimant(session): RequireClaimant,
    State(service): State<Arc<CheckInService>>,
    AppJson(dto): AppJson<OpenCameraDto>,
) -> Result<Json<ApiResponse<CheckInStatusDto>>> {
    service.open_camera(&session.checkin, dto.granted).await?;

    Ok(Json(ApiResponse::success(
        Some(service.status(&session.checkin)),
        Some("Position your face in the circle".to_string()),
        None,
    )))
}

/// Capture a frame and verify it; a verified frame marks attendance
#[utoipa::path(
    post,
    path = "/api/checkin/capture",
    request_body = CaptureFrameDto,
    responses(
        (status = 200, description = "Attendance marked", body = ApiResponse<AttendanceRecordDto>),
        (status = 400, description = "Malformed frame"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Camera not active or a capture is already running"),
        (status = 422, description = "Face not recognized")
    ),
    security(("bearer_auth" = [])),
    tag = "checkin"
)]
pub async fn capture_frame(
    RequireClaimant(session): RequireClaimant,
    State(service): State<Arc<CheckInService>>,
    AppJson(dto): AppJson<CaptureFrameDto>,
) -> Result<Json<ApiResponse<AttendanceRecordDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let frame = dto.decode()?;

    let record = service.capture(&session.checkin, frame).await?;

    Ok(Json(ApiResponse::success(
        Some(AttendanceRecordDto::from(record)),
        Some("Attendance marked successfully!".to_string()),
        None,
    )))
}

/// Abandon the current attempt and release the camera
#[utoipa::path(
    post,
    path = "/api/checkin/cancel",
    responses(
        (status = 200, description = "Attempt cancelled", body = ApiResponse<CheckInStatusDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "checkin"
)]
pub async fn cancel_checkin(
    RequireClaimant(session): RequireClaimant,
    State(service): State<Arc<CheckInService>>,
) -> Result<Json<ApiResponse<CheckInStatusDto>>> {
    let cancelled = service.cancel(&session.checkin).await;
    tracing::debug!(
        "Cancel requested by {}: was {}",
        session.profile.subject_id,
        cancelled
    );

    Ok(Json(ApiResponse::success(
        Some(service.status(&session.checkin)),
        None,
        None,
    )))
}
