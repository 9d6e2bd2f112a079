use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::sessions::dtos::{
    LoginDto, RegisterClaimantDto, RegisterReviewerDto, SessionProfileDto, SessionResponseDto,
};
use crate::features::sessions::model::SessionContext;
use crate::features::sessions::services::SessionService;
use crate::shared::types::ApiResponse;

/// Register a claimant and open their session
#[utoipa::path(
    post,
    path = "/api/sessions/claimant/register",
    request_body = RegisterClaimantDto,
    responses(
        (status = 201, description = "Claimant session opened", body = ApiResponse<SessionResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "sessions"
)]
pub async fn register_claimant(
    State(service): State<Arc<SessionService>>,
    AppJson(dto): AppJson<RegisterClaimantDto>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponseDto>>)> {
    let session = service.register_claimant(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(session),
            Some("Registration successful!".to_string()),
            None,
        )),
    ))
}

/// Log in as a claimant
///
/// Any non-empty email/password pair opens a session with the demo student profile.
#[utoipa::path(
    post,
    path = "/api/sessions/claimant/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Claimant session opened", body = ApiResponse<SessionResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "sessions"
)]
pub async fn login_claimant(
    State(service): State<Arc<SessionService>>,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    let session = service.login_claimant(dto).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

/// Register a reviewer and open their session
#[utoipa::path(
    post,
    path = "/api/sessions/reviewer/register",
    request_body = RegisterReviewerDto,
    responses(
        (status = 201, description = "Reviewer session opened", body = ApiResponse<SessionResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "sessions"
)]
pub async fn register_reviewer(
    State(service): State<Arc<SessionService>>,
    AppJson(dto): AppJson<RegisterReviewerDto>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponseDto>>)> {
    let session = service.register_reviewer(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(session),
            Some("Registration successful!".to_string()),
            None,
        )),
    ))
}

/// Log in as a reviewer
///
/// Any non-empty email/password pair opens a session with the demo teacher profile.
#[utoipa::path(
    post,
    path = "/api/sessions/reviewer/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Reviewer session opened", body = ApiResponse<SessionResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "sessions"
)]
pub async fn login_reviewer(
    State(service): State<Arc<SessionService>>,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    let session = service.login_reviewer(dto).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

/// Get the profile bound to the current session
#[utoipa::path(
    get,
    path = "/api/sessions/me",
    responses(
        (status = 200, description = "Current session profile", body = ApiResponse<SessionProfileDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn get_session(session: SessionContext) -> Result<Json<ApiResponse<SessionProfileDto>>> {
    Ok(Json(ApiResponse::success(
        Some(SessionProfileDto::from(&session)),
        None,
        None,
    )))
}

/// Close the current session
///
/// A claimant's in-flight check-in attempt is cancelled and the camera released.
#[utoipa::path(
    post,
    path = "/api/sessions/logout",
    responses(
        (status = 200, description = "Session closed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn logout(
    session: SessionContext,
    State(service): State<Arc<SessionService>>,
) -> Result<Json<ApiResponse<()>>> {
    service.logout(session.token()).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Logged out".to_string()),
        None,
    )))
}
