use chrono::NaiveDate;

use crate::features::attendance::{AttendanceRecord, Department};
use crate::shared::constants::DATE_FORMAT;

/// Header labels, in export column order
pub const EXPORT_HEADERS: [&str; 10] = [
    "Student Name",
    "Student ID",
    "Year",
    "Course",
    "Department",
    "Date",
    "Time",
    "Status",
    "Latitude",
    "Longitude",
];

/// A rendered export and the filename it should be delivered under
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// `{department}_attendance_{today}.csv`, with the date's slashes made filename-safe
pub fn export_filename(department: Department, today: NaiveDate) -> String {
    format!(
        "{}_attendance_{}.csv",
        department,
        today.format(DATE_FORMAT).to_string().replace('/', "-")
    )
}

/// Quote a field when it contains a delimiter, a quote or a line break (RFC 4180)
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn row(record: &AttendanceRecord) -> [String; 10] {
    [
        record.subject_name.clone(),
        record.subject_id.clone(),
        record.cohort_year.to_string(),
        record.program_level.to_string(),
        record.department.to_string(),
        record.date.clone(),
        record.time.clone(),
        record.status.to_string(),
        record.latitude.clone(),
        record.longitude.clone(),
    ]
}

/// Header row, then one row per record in the given order
pub fn render_csv(records: &[AttendanceRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(EXPORT_HEADERS.join(","));
    for record in records {
        let fields: Vec<String> = row(record).iter().map(|f| escape_field(f)).collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_record;

    #[test]
    fn test_header_and_column_order() {
        let mut record = sample_record(Department::Bca, "22BCA017", "3/7/2026");
        record.subject_name = "Anitha".to_string();
        record.time = "9:05:42 AM".to_string();
        record.latitude = "10.997201".to_string();
        record.longitude = "76.837499".to_string();

        let csv = render_csv(&[record]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Student Name,Student ID,Year,Course,Department,Date,Time,Status,Latitude,Longitude"
        );
        assert_eq!(
            lines[1],
            "Anitha,22BCA017,II,UG,BCA,3/7/2026,9:05:42 AM,Present,10.997201,76.837499"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let mut record = sample_record(Department::Bca, "22BCA017", "3/7/2026");
        record.subject_name = "Ravi, K \"RK\"".to_string();

        let csv = render_csv(&[record]);
        let data = csv.lines().nth(1).unwrap();

        assert!(data.starts_with("\"Ravi, K \"\"RK\"\"\",22BCA017,"));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(render_csv(&[]), EXPORT_HEADERS.join(","));
    }

    #[test]
    fn test_export_filename() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            export_filename(Department::BCom, today),
            "B.COM_attendance_3-7-2026.csv"
        );
    }
}
