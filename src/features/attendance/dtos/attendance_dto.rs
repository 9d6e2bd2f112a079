use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::attendance::models::{
    AttendanceRecord, AttendanceStatus, CohortYear, Department, ProgramLevel,
};

/// Response DTO for an attendance record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordDto {
    pub id: Uuid,
    pub subject_name: String,
    pub subject_id: String,
    pub cohort_year: CohortYear,
    pub program_level: ProgramLevel,
    pub department: Department,
    #[schema(example = "3/7/2026")]
    pub date: String,
    #[schema(example = "9:05:42 AM")]
    pub time: String,
    pub status: AttendanceStatus,
    #[schema(example = "10.997201")]
    pub latitude: String,
    #[schema(example = "76.837499")]
    pub longitude: String,
}

impl From<AttendanceRecord> for AttendanceRecordDto {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            id: r.id,
            subject_name: r.subject_name,
            subject_id: r.subject_id,
            cohort_year: r.cohort_year,
            program_level: r.program_level,
            department: r.department,
            date: r.date,
            time: r.time,
            status: r.status,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

/// Response DTO for a claimant's own history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceHistoryDto {
    pub total_attendance: usize,
    pub records: Vec<AttendanceRecordDto>,
}
