use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::attendance::dtos::{AttendanceHistoryDto, AttendanceRecordDto};
use crate::features::attendance::services::AttendanceLedger;
use crate::features::sessions::guards::RequireClaimant;
use crate::shared::types::ApiResponse;

/// Get the attendance committed in the current claimant session (newest first)
#[utoipa::path(
    get,
    path = "/api/attendance/me",
    responses(
        (status = 200, description = "Attendance history", body = ApiResponse<AttendanceHistoryDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a claimant session")
    ),
    security(("bearer_auth" = [])),
    tag = "attendance"
)]
pub async fn get_my_attendance(
    RequireClaimant(session): RequireClaimant,
    State(ledger): State<Arc<AttendanceLedger>>,
) -> Result<Json<ApiResponse<AttendanceHistoryDto>>> {
    let records = ledger
        .for_records(&session.checkin.committed_records())
        .await;
    let dto = AttendanceHistoryDto {
        total_attendance: records.len(),
        records: records.into_iter().map(AttendanceRecordDto::from).collect(),
    };
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::attendance::routes::routes;
    use crate::features::checkin::providers::ReportedLocation;
    use crate::features::checkin::{CheckInHandle, CheckInService};
    use crate::features::sessions::model::{ClaimantSession, SessionContext};
    use crate::shared::test_helpers::{
        checkin_service, jpeg_frame, sample_profile, with_session, ScriptedVerifier, CAMPUS,
    };
    use axum_test::TestServer;
    use serde_json::Value;
    use uuid::Uuid;

    async fn check_in(service: &CheckInService, handle: &CheckInHandle) -> Uuid {
        service
            .submit_location(handle, ReportedLocation::fix(CAMPUS))
            .await
            .unwrap();
        service.open_camera(handle, true).await.unwrap();
        service.capture(handle, jpeg_frame()).await.unwrap().id
    }

    #[tokio::test]
    async fn test_history_lists_only_this_sessions_records_newest_first() {
        let (checkin, ledger) = checkin_service(Arc::new(ScriptedVerifier::always(true)));
        let profile = sample_profile();
        let own = checkin.create_machine(profile.clone());
        // Another demo login with the same subject id
        let other = checkin.create_machine(profile.clone());

        let first = check_in(&checkin, &own).await;
        check_in(&checkin, &other).await;
        let second = check_in(&checkin, &own).await;

        let session = SessionContext::Claimant(Arc::new(ClaimantSession {
            token: Uuid::now_v7(),
            email: "anitha@college.edu".to_string(),
            checkin: own,
            profile,
        }));
        let server = TestServer::new(with_session(routes(ledger), session)).unwrap();

        let response = server.get("/api/attendance/me").await;
        response.assert_status_ok();
        let body: Value = response.json();

        assert_eq!(body["data"]["totalAttendance"], 2);
        assert_eq!(body["data"]["records"][0]["id"], second.to_string());
        assert_eq!(body["data"]["records"][1]["id"], first.to_string());
    }
}
