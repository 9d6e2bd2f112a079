use tokio::sync::RwLock;
use uuid::Uuid;

use crate::features::attendance::models::{AttendanceRecord, Department};

/// Append-only, process-wide store of attendance records.
///
/// Appends are serialized through the write lock; every read returns an owned
/// snapshot so callers never hold the lock while filtering.
pub struct AttendanceLedger {
    records: RwLock<Vec<AttendanceRecord>>,
}

impl AttendanceLedger {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Append a committed record. No dedup: one subject may check in many times a day.
    pub async fn append(&self, record: AttendanceRecord) {
        let mut records = self.records.write().await;
        tracing::info!(
            "Ledger append: record={}, subject={}, department={}, position={}",
            record.id,
            record.subject_id,
            record.department,
            records.len()
        );
        records.push(record);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// All records, newest first
    #[cfg(test)]
    pub async fn snapshot(&self) -> Vec<AttendanceRecord> {
        let records = self.records.read().await;
        records.iter().rev().cloned().collect()
    }

    /// Records of one department, newest first
    pub async fn for_department(&self, department: Department) -> Vec<AttendanceRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .rev()
            .filter(|r| r.department == department)
            .cloned()
            .collect()
    }

    /// The records with the given ids, newest first. Unknown ids are skipped.
    pub async fn for_records(&self, ids: &[Uuid]) -> Vec<AttendanceRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .rev()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect()
    }
}

impl Default for AttendanceLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_record;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_snapshot_is_newest_first() {
        let ledger = AttendanceLedger::new();
        let first = sample_record(Department::Bca, "S1", "3/7/2026");
        let second = sample_record(Department::Bca, "S2", "3/7/2026");

        ledger.append(first.clone()).await;
        ledger.append(second.clone()).await;

        let snapshot = ledger.snapshot().await;
        assert_eq!(snapshot, vec![second, first]);
    }

    #[tokio::test]
    async fn test_duplicate_check_ins_are_kept() {
        let ledger = AttendanceLedger::new();
        let first = sample_record(Department::Bca, "S1", "3/7/2026");
        let second = sample_record(Department::Bca, "S1", "3/7/2026");
        ledger.append(first.clone()).await;
        ledger.append(second.clone()).await;

        assert_eq!(ledger.len().await, 2);
        assert_eq!(
            ledger.for_records(&[first.id, second.id]).await,
            vec![second, first]
        );
    }

    #[tokio::test]
    async fn test_scoped_reads() {
        let ledger = AttendanceLedger::new();
        ledger.append(sample_record(Department::Bca, "S1", "3/7/2026")).await;
        ledger.append(sample_record(Department::Mca, "S2", "3/7/2026")).await;
        ledger.append(sample_record(Department::Bca, "S3", "3/8/2026")).await;

        let bca = ledger.for_department(Department::Bca).await;
        assert_eq!(bca.len(), 2);
        assert_eq!(bca[0].subject_id, "S3");
        assert!(bca.iter().all(|r| r.department == Department::Bca));

        assert!(ledger.for_department(Department::Mba).await.is_empty());
        assert!(ledger.for_records(&[Uuid::now_v7()]).await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let ledger = Arc::new(AttendanceLedger::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger
                    .append(sample_record(Department::Bba, &format!("S{}", i), "3/7/2026"))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(ledger.len().await, 32);
    }
}
