// src/export/model.rs

use crate::core::history::IdealLine;
use crate::models::alert::AlertRecord;
use crate::models::snapshot::HistorySnapshot;
use crate::models::sprint::KEY_FORMAT;
use serde::Serialize;

/// Flat row shape shared by the tabular writers.
pub trait ExportRow: Serialize {
    fn headers() -> Vec<&'static str>;
    fn to_row(&self) -> Vec<String>;
}

/// One burndown snapshot plus the ideal value of that day.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct HistoryExport {
    pub sprint_key: String,
    pub snapshot_date: String,
    pub total_remaining_days: f64,
    pub remaining_task_count: i64,
    pub completed_task_count: i64,
    pub ideal_remaining_days: Option<f64>,
}

impl HistoryExport {
    pub fn from_snapshot(s: &HistorySnapshot, ideal: Option<&IdealLine>) -> Self {
        Self {
            sprint_key: s.sprint_key.clone(),
            snapshot_date: s.snapshot_date.format(KEY_FORMAT).to_string(),
            total_remaining_days: s.total_remaining_days,
            remaining_task_count: s.remaining_task_count,
            completed_task_count: s.completed_task_count,
            ideal_remaining_days: ideal.map(|l| round2(l.value_at(s.snapshot_date))),
        }
    }
}

impl ExportRow for HistoryExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "sprint_key",
            "snapshot_date",
            "total_remaining_days",
            "remaining_task_count",
            "completed_task_count",
            "ideal_remaining_days",
        ]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.sprint_key.clone(),
            self.snapshot_date.clone(),
            self.total_remaining_days.to_string(),
            self.remaining_task_count.to_string(),
            self.completed_task_count.to_string(),
            self.ideal_remaining_days
                .map(|v| v.to_string())
                .unwrap_or_default(),
        ]
    }
}

/// One evaluated alert.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AlertExport {
    pub alert_id: String,
    pub kind: String,
    pub ticket_key: String,
    pub assignee: String,
    pub details: String,
    pub computed_at: String,
    pub dismissed: bool,
}

impl AlertExport {
    pub fn from_alert(a: &AlertRecord, dismissed: bool) -> Self {
        Self {
            alert_id: a.id.clone(),
            kind: a.kind.label().to_string(),
            ticket_key: a.ticket_key.clone(),
            assignee: a.assignee.clone(),
            details: a.details.clone(),
            computed_at: a.computed_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            dismissed,
        }
    }
}

impl ExportRow for AlertExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "alert_id",
            "kind",
            "ticket_key",
            "assignee",
            "details",
            "computed_at",
            "dismissed",
        ]
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.alert_id.clone(),
            self.kind.clone(),
            self.ticket_key.clone(),
            self.assignee.clone(),
            self.details.clone(),
            self.computed_at.clone(),
            self.dismissed.to_string(),
        ]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
