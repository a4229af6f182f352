use chrono::NaiveDate;
use serde::Serialize;

/// One day's aggregate burndown measurement for a sprint window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySnapshot {
    pub sprint_key: String,
    pub snapshot_date: NaiveDate,
    pub total_remaining_days: f64,
    pub remaining_task_count: i64,
    pub completed_task_count: i64,
}

/// Batch totals that feed a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchAggregate {
    pub total_remaining_days: f64,
    pub remaining_task_count: i64,
    pub completed_task_count: i64,
}

impl BatchAggregate {
    pub fn into_snapshot(self, sprint_key: &str, snapshot_date: NaiveDate) -> HistorySnapshot {
        HistorySnapshot {
            sprint_key: sprint_key.to_string(),
            snapshot_date,
            total_remaining_days: self.total_remaining_days,
            remaining_task_count: self.remaining_task_count,
            completed_task_count: self.completed_task_count,
        }
    }
}
