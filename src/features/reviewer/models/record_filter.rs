use chrono::NaiveDate;
use std::str::FromStr;

use crate::features::attendance::{AttendanceRecord, Department};
use crate::shared::constants::{DATE_FORMAT, DEPARTMENT_FILTER_ALL};

/// Department selector of the reviewer dashboard.
///
/// Applied after the reviewer's scope, so it can only narrow further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepartmentFilter {
    #[default]
    All,
    Only(Department),
}

impl FromStr for DepartmentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DEPARTMENT_FILTER_ALL {
            return Ok(DepartmentFilter::All);
        }
        Department::from_str(s).map(DepartmentFilter::Only)
    }
}

/// The three independent dashboard filters. Empty values match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Case-insensitive substring of the subject's name or id
    pub search: String,
    /// Exact calendar date, compared in the record's locale format
    pub date: Option<NaiveDate>,
    pub department: DepartmentFilter,
}

impl RecordFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.matches_search(record) && self.matches_date(record) && self.matches_department(record)
    }

    fn matches_search(&self, record: &AttendanceRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        record.subject_name.to_lowercase().contains(&term)
            || record.subject_id.to_lowercase().contains(&term)
    }

    fn matches_date(&self, record: &AttendanceRecord) -> bool {
        match self.date {
            Some(date) => record.date == date.format(DATE_FORMAT).to_string(),
            None => true,
        }
    }

    fn matches_department(&self, record: &AttendanceRecord) -> bool {
        match self.department {
            DepartmentFilter::All => true,
            DepartmentFilter::Only(department) => record.department == department,
        }
    }
}
