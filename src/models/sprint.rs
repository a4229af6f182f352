use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

pub const KEY_FORMAT: &str = "%Y-%m-%d";

/// A labeled date range bounding one iteration of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SprintWindow {
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SprintWindow {
    /// Build a window, refusing `start > end`.
    pub fn new(label: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Option<Self> {
        if start_date > end_date {
            return None;
        }
        Some(Self {
            label: label.into(),
            start_date,
            end_date,
        })
    }

    /// Bucketing key: the end date as `YYYY-MM-DD`.
    pub fn key(&self) -> String {
        self.end_date.format(KEY_FORMAT).to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Ordering used to pick the active window: earliest end, then earliest start.
    pub fn cmp_activity(&self, other: &Self) -> Ordering {
        self.end_date
            .cmp(&other.end_date)
            .then(self.start_date.cmp(&other.start_date))
    }
}

pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), KEY_FORMAT).ok()
}
