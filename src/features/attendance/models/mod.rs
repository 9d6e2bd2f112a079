mod attendance_record;
mod subject_profile;

pub use attendance_record::{AttendanceRecord, AttendanceStatus};
pub use subject_profile::{CohortYear, Department, ProgramLevel, SubjectProfile};
