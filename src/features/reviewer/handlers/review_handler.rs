use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;

use crate::core::error::Result;
use crate::features::attendance::dtos::AttendanceRecordDto;
use crate::features::reviewer::dtos::{RecordQueryDto, ReviewStatsDto};
use crate::features::reviewer::services::ReviewService;
use crate::features::sessions::guards::RequireReviewer;
use crate::shared::types::{ApiResponse, Meta};

/// Dashboard counters for the reviewer's department
#[utoipa::path(
    get,
    path = "/api/reviewer/stats",
    responses(
        (status = 200, description = "Department statistics", body = ApiResponse<ReviewStatsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a reviewer session")
    ),
    security(("bearer_auth" = [])),
    tag = "reviewer"
)]
pub async fn get_stats(
    RequireReviewer(session): RequireReviewer,
    State(service): State<Arc<ReviewService>>,
) -> Result<Json<ApiResponse<ReviewStatsDto>>> {
    let stats = service
        .stats(&session.scope, Local::now().date_naive())
        .await;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Attendance records of the reviewer's department, filtered, newest first
#[utoipa::path(
    get,
    path = "/api/reviewer/records",
    params(RecordQueryDto),
    responses(
        (status = 200, description = "Filtered records", body = ApiResponse<Vec<AttendanceRecordDto>>),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a reviewer session")
    ),
    security(("bearer_auth" = [])),
    tag = "reviewer"
)]
pub async fn list_records(
    RequireReviewer(session): RequireReviewer,
    State(service): State<Arc<ReviewService>>,
    Query(query): Query<RecordQueryDto>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecordDto>>>> {
    let filter = query.into_filter()?;
    let records: Vec<AttendanceRecordDto> = service
        .records(&session.scope, &filter)
        .await
        .into_iter()
        .map(AttendanceRecordDto::from)
        .collect();

    let total = records.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(records),
        None,
        Some(Meta { total }),
    )))
}

/// Download the filtered records as CSV
#[utoipa::path(
    get,
    path = "/api/reviewer/export",
    params(RecordQueryDto),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a reviewer session")
    ),
    security(("bearer_auth" = [])),
    tag = "reviewer"
)]
pub async fn export_records(
    RequireReviewer(session): RequireReviewer,
    State(service): State<Arc<ReviewService>>,
    Query(query): Query<RecordQueryDto>,
) -> Result<Response> {
    let filter = query.into_filter()?;
    let export = service
        .export(&session.scope, &filter, Local::now().date_naive())
        .await;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    )
        .into_response())
}
