use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::features::attendance::{AttendanceLedger, AttendanceRecord};
use crate::features::reviewer::dtos::ReviewStatsDto;
use crate::features::reviewer::models::{RecordFilter, ReviewScope};
use crate::features::reviewer::services::csv_export::{export_filename, render_csv, CsvExport};
use crate::shared::constants::DATE_FORMAT;

/// Records inside the reviewer's scope. Always the first step of every read.
pub fn scope_records(records: Vec<AttendanceRecord>, scope: &ReviewScope) -> Vec<AttendanceRecord> {
    records.into_iter().filter(|r| scope.permits(r)).collect()
}

/// Statistics over an already scoped set
pub fn compute_stats(
    scoped: &[AttendanceRecord],
    scope: &ReviewScope,
    today: NaiveDate,
) -> ReviewStatsDto {
    let today = today.format(DATE_FORMAT).to_string();
    let unique_subjects = scoped
        .iter()
        .map(|r| r.subject_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    ReviewStatsDto {
        department: scope.department(),
        total_records: scoped.len(),
        unique_subjects,
        today_records: scoped.iter().filter(|r| r.date == today).count(),
    }
}

/// Read side of the ledger for reviewers.
///
/// Every query recomputes from a fresh ledger snapshot; nothing is cached.
pub struct ReviewService {
    ledger: Arc<AttendanceLedger>,
}

impl ReviewService {
    pub fn new(ledger: Arc<AttendanceLedger>) -> Self {
        Self { ledger }
    }

    async fn scoped(&self, scope: &ReviewScope) -> Vec<AttendanceRecord> {
        self.ledger.for_department(scope.department()).await
    }

    pub async fn stats(&self, scope: &ReviewScope, today: NaiveDate) -> ReviewStatsDto {
        let scoped = self.scoped(scope).await;
        compute_stats(&scoped, scope, today)
    }

    /// Scope, then search, date and department filters; newest first
    pub async fn records(&self, scope: &ReviewScope, filter: &RecordFilter) -> Vec<AttendanceRecord> {
        let records = scope_records(self.scoped(scope).await, scope);
        records.into_iter().filter(|r| filter.matches(r)).collect()
    }

    pub async fn export(
        &self,
        scope: &ReviewScope,
        filter: &RecordFilter,
        today: NaiveDate,
    ) -> CsvExport {
        let records = self.records(scope, filter).await;
        tracing::info!(
            "Exporting {} attendance records for {}",
            records.len(),
            scope.department()
        );
        CsvExport {
            filename: export_filename(scope.department(), today),
            content: render_csv(&records),
        }
    }
}
