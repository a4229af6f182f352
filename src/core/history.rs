//! History Accumulator: one burndown snapshot per (sprint window, day).

use crate::db::queries::{delete_snapshot, load_snapshots, upsert_snapshot};
use crate::errors::{AppError, AppResult};
use crate::models::snapshot::HistorySnapshot;
use crate::models::sprint::SprintWindow;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

pub struct HistoryAccumulator<'c> {
    conn: &'c Connection,
}

impl<'c> HistoryAccumulator<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Upsert by `(sprint_key, snapshot_date)`; a re-upload on the same day
    /// overwrites the earlier value.
    pub fn record(&self, snapshot: &HistorySnapshot) -> AppResult<UpsertOutcome> {
        if upsert_snapshot(self.conn, snapshot)? {
            Ok(UpsertOutcome::Replaced)
        } else {
            Ok(UpsertOutcome::Inserted)
        }
    }

    /// All snapshots of a window, oldest first.
    pub fn series(&self, sprint_key: &str) -> AppResult<Vec<HistorySnapshot>> {
        load_snapshots(self.conn, sprint_key)
    }

    pub fn delete(&self, sprint_key: &str, date: NaiveDate) -> AppResult<()> {
        match delete_snapshot(self.conn, sprint_key, &date)? {
            0 => Err(AppError::NoHistoryEntry(
                sprint_key.to_string(),
                date.format("%Y-%m-%d").to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Reference line of a burndown chart, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdealLine {
    pub start_date: NaiveDate,
    pub start_value: f64,
    pub end_date: NaiveDate,
}

impl IdealLine {
    /// Linear interpolation between `(start, start_value)` and `(end, 0)`.
    pub fn value_at(&self, date: NaiveDate) -> f64 {
        if date <= self.start_date {
            return self.start_value;
        }
        if date >= self.end_date {
            return 0.0;
        }
        let span = (self.end_date - self.start_date).num_days() as f64;
        let left = (self.end_date - date).num_days() as f64;
        self.start_value * left / span
    }
}

/// Ideal line for a window: starts from the latest snapshot at or before the
/// start date (or the earliest snapshot when none is that old).
pub fn ideal_burndown(window: &SprintWindow, snapshots: &[HistorySnapshot]) -> Option<IdealLine> {
    let baseline = snapshots
        .iter()
        .filter(|s| s.snapshot_date <= window.start_date)
        .max_by_key(|s| s.snapshot_date)
        .or_else(|| snapshots.iter().min_by_key(|s| s.snapshot_date))?;

    Some(IdealLine {
        start_date: window.start_date,
        start_value: baseline.total_remaining_days,
        end_date: window.end_date,
    })
}
