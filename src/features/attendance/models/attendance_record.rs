use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::attendance::models::{CohortYear, Department, ProgramLevel, SubjectProfile};
use crate::features::geofence::Coordinate;
use crate::shared::constants::{COORDINATE_DECIMALS, DATE_FORMAT, TIME_FORMAT};

/// Attendance status. A commit only ever produces `Present`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStatus {
    Present,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
        }
    }
}

/// One committed check-in. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub subject_name: String,
    pub subject_id: String,
    pub cohort_year: CohortYear,
    pub program_level: ProgramLevel,
    pub department: Department,
    /// Locale-formatted calendar date
    pub date: String,
    /// Locale-formatted time of day
    pub time: String,
    pub status: AttendanceStatus,
    /// Fixed 6-decimal latitude of the coordinate that passed the geofence
    pub latitude: String,
    /// Fixed 6-decimal longitude of the coordinate that passed the geofence
    pub longitude: String,
}

impl AttendanceRecord {
    /// Build the record for a verified check-in at `now`
    pub fn present<Tz>(profile: &SubjectProfile, verified: Coordinate, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id: Uuid::now_v7(),
            subject_name: profile.name.clone(),
            subject_id: profile.subject_id.clone(),
            cohort_year: profile.cohort_year,
            program_level: profile.program_level,
            department: profile.department,
            date: now.format(DATE_FORMAT).to_string(),
            time: now.format(TIME_FORMAT).to_string(),
            status: AttendanceStatus::Present,
            latitude: format!("{:.*}", COORDINATE_DECIMALS, verified.latitude),
            longitude: format!("{:.*}", COORDINATE_DECIMALS, verified.longitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn profile() -> SubjectProfile {
        SubjectProfile {
            name: "Anitha".to_string(),
            subject_id: "22BCA017".to_string(),
            cohort_year: CohortYear::II,
            program_level: ProgramLevel::UG,
            department: Department::Bca,
        }
    }

    #[test]
    fn test_present_copies_profile_and_coordinate() {
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 42).unwrap();
        let record = AttendanceRecord::present(
            &profile(),
            Coordinate::new(10.9972014, -76.83749949),
            &now,
        );

        assert_eq!(record.subject_name, "Anitha");
        assert_eq!(record.subject_id, "22BCA017");
        assert_eq!(record.department, Department::Bca);
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.latitude, "10.997201");
        assert_eq!(record.longitude, "-76.837499");
        assert_eq!(record.date, "3/7/2026");
        assert_eq!(record.time, "9:05:42 AM");
    }

    #[test]
    fn test_present_formats_in_the_given_timezone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = ist.with_ymd_and_hms(2026, 12, 31, 23, 59, 1).unwrap();
        let record = AttendanceRecord::present(&profile(), Coordinate::new(0.0, 0.0), &now);

        assert_eq!(record.date, "12/31/2026");
        assert_eq!(record.time, "11:59:01 PM");
        assert_eq!(record.latitude, "0.000000");
    }
}
