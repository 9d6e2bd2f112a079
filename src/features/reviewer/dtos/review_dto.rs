use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::AppError;
use crate::features::attendance::Department;
use crate::features::reviewer::models::{DepartmentFilter, RecordFilter};

/// Query parameters shared by the record list and the export
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RecordQueryDto {
    /// Case-insensitive substring of student name or id
    pub search: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    #[param(example = "2026-03-07")]
    pub date: Option<String>,
    /// Department label or `All`
    #[param(example = "All")]
    pub department: Option<String>,
}

impl RecordQueryDto {
    pub fn into_filter(self) -> Result<RecordFilter, AppError> {
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
            })?),
        };

        let department = match self.department.as_deref().map(str::trim) {
            None | Some("") => DepartmentFilter::All,
            Some(raw) => raw.parse::<DepartmentFilter>().map_err(AppError::Validation)?,
        };

        Ok(RecordFilter {
            search: self.search.unwrap_or_default(),
            date,
            department,
        })
    }
}

/// Response DTO for the reviewer dashboard counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatsDto {
    pub department: Department,
    pub total_records: usize,
    pub unique_subjects: usize,
    pub today_records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_empty_filter() {
        let filter = RecordQueryDto {
            search: None,
            date: Some(String::new()),
            department: None,
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter, RecordFilter::default());
    }

    #[test]
    fn test_query_parses_date_and_department() {
        let filter = RecordQueryDto {
            search: Some("anitha".to_string()),
            date: Some("2026-03-07".to_string()),
            department: Some("BCA".to_string()),
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.search, "anitha");
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2026, 3, 7));
        assert_eq!(filter.department, DepartmentFilter::Only(Department::Bca));
    }

    #[test]
    fn test_query_rejects_bad_values() {
        let bad_date = RecordQueryDto {
            date: Some("07/03/2026".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_date.into_filter(), Err(AppError::Validation(_))));

        let bad_department = RecordQueryDto {
            department: Some("Physics".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_department.into_filter(),
            Err(AppError::Validation(_))
        ));
    }
}
