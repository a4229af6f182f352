//! Field Normalizer: turns one raw export row into a [`NormalizedRecord`].
//!
//! This is the only place where loosely typed input is looked at. A bad row
//! is never an error here: it is defaulted or dropped, and counted.

use crate::core::sprint::parse_sprint_label;
use crate::models::sprint::KEY_FORMAT;
use crate::models::ticket::{NormalizedRecord, Priority, RawTicketRow, TicketStatus};
use serde::Serialize;
use std::collections::HashMap;

/// 8-hour working day.
pub const SECONDS_PER_DAY: f64 = 28_800.0;

/// Column names used by tracker CSV exports.
pub mod columns {
    pub const KEY: &str = "Issue key";
    pub const STATUS: &str = "Status";
    pub const STORY_POINTS: &str = "Custom field (Story Points)";
    pub const STORY_POINTS_FRAGMENT: &str = "Story Points";
    pub const REMAINING: &str = "Remaining Estimate";
    pub const SPENT: &str = "Time Spent";
    pub const ASSIGNEE: &str = "Assignee";
    pub const PRIORITY: &str = "Priority";
    pub const SPRINT_FRAGMENT: &str = "Sprint";
    pub const SUMMARY: &str = "Summary";
    pub const ISSUE_TYPE: &str = "Issue Type";
    pub const PARENT_KEY: &str = "Parent key";
    pub const PARENT: &str = "Parent";
}

/// Diagnostics collected over one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows_seen: usize,
    pub accepted: usize,
    pub excluded: usize,
    pub missing_key: usize,
    pub defaulted_fields: usize,
    pub unknown_status: usize,
    /// Rows whose key was already seen; the later row wins.
    pub duplicate_keys: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Records that take part in aggregates and alerts (never excluded ones).
    pub records: Vec<NormalizedRecord>,
    pub stats: NormalizeStats,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Missing,
    Value(f64),
    Malformed,
}

fn parse_numeric(raw: Option<&str>) -> Numeric {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Numeric::Missing;
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Numeric::Value(v.max(0.0)),
        _ => Numeric::Malformed,
    }
}

/// First whitespace-delimited token of a full name.
pub fn first_name(full: &str) -> String {
    full.split_whitespace().next().unwrap_or("").to_string()
}

pub struct FieldNormalizer {
    excluded_assignee: String,
}

impl FieldNormalizer {
    pub fn new(excluded_assignee: &str) -> Self {
        Self {
            excluded_assignee: first_name(excluded_assignee),
        }
    }

    fn is_excluded(&self, first: &str) -> bool {
        !self.excluded_assignee.is_empty() && self.excluded_assignee.eq_ignore_ascii_case(first)
    }

    /// Normalize one row. `None` means the row has no ticket key and is dropped.
    pub fn normalize_row(
        &self,
        row: &RawTicketRow,
        stats: &mut NormalizeStats,
    ) -> Option<NormalizedRecord> {
        stats.rows_seen += 1;

        let Some(key) = row.get(columns::KEY) else {
            stats.missing_key += 1;
            return None;
        };

        let raw_status = row.get(columns::STATUS).unwrap_or("").to_string();
        let status = TicketStatus::from_raw(&raw_status).unwrap_or_else(|| {
            stats.unknown_status += 1;
            TicketStatus::Other
        });

        let sp_raw = row
            .get(columns::STORY_POINTS)
            .or_else(|| row.get_containing(columns::STORY_POINTS_FRAGMENT));
        let story_points_days = match parse_numeric(sp_raw) {
            Numeric::Value(v) => v,
            Numeric::Missing => 0.0,
            Numeric::Malformed => {
                stats.defaulted_fields += 1;
                0.0
            }
        };

        let mut read_seconds = |column: &str| match parse_numeric(row.get(column)) {
            Numeric::Value(v) => Some(v / SECONDS_PER_DAY),
            Numeric::Missing => None,
            Numeric::Malformed => {
                stats.defaulted_fields += 1;
                Some(0.0)
            }
        };
        let remaining = read_seconds(columns::REMAINING);
        let spent = read_seconds(columns::SPENT);

        let (remaining_days, spent_days) = match status {
            TicketStatus::ToDo => (story_points_days, 0.0),
            TicketStatus::DoneLike => (0.0, story_points_days),
            TicketStatus::InProgress | TicketStatus::Other => {
                let spent = spent.unwrap_or(0.0);
                let remaining = remaining.unwrap_or_else(|| (story_points_days - spent).max(0.0));
                (remaining, spent)
            }
        };

        let assignee_first_name = first_name(row.get(columns::ASSIGNEE).unwrap_or(""));
        let excluded = self.is_excluded(&assignee_first_name);

        let sprint_key = row
            .values_containing(columns::SPRINT_FRAGMENT)
            .into_iter()
            .filter_map(parse_sprint_label)
            .max()
            .map(|d| d.format(KEY_FORMAT).to_string());

        if excluded {
            stats.excluded += 1;
        } else {
            stats.accepted += 1;
        }

        Some(NormalizedRecord {
            key: key.to_string(),
            status,
            raw_status,
            story_points_days,
            remaining_days,
            spent_days,
            priority: Priority::from_raw(row.get(columns::PRIORITY).unwrap_or("")),
            assignee_first_name,
            excluded,
            summary: row.get(columns::SUMMARY).unwrap_or("").to_string(),
            issue_type: row.get(columns::ISSUE_TYPE).unwrap_or("").to_string(),
            sprint_key,
            parent_key: row
                .get(columns::PARENT_KEY)
                .or_else(|| row.get(columns::PARENT))
                .map(str::to_string),
        })
    }

    /// Normalize a whole import. Excluded rows are counted, then dropped.
    pub fn normalize_batch(&self, rows: &[RawTicketRow]) -> NormalizedBatch {
        let mut stats = NormalizeStats::default();
        let mut records: Vec<NormalizedRecord> = Vec::with_capacity(rows.len());
        let mut index: HashMap<String, usize> = HashMap::new();

        let normalized: Vec<NormalizedRecord> = rows
            .iter()
            .filter_map(|r| self.normalize_row(r, &mut stats))
            .filter(|r| !r.excluded)
            .collect();

        for rec in normalized {
            match index.get(&rec.key) {
                Some(&i) => {
                    stats.duplicate_keys += 1;
                    records[i] = rec;
                }
                None => {
                    index.insert(rec.key.clone(), records.len());
                    records.push(rec);
                }
            }
        }

        stats.accepted = records.len();
        NormalizedBatch { records, stats }
    }
}
