//! Sprint Window Resolver.
//!
//! Infers sprint windows from labels like `Sprint.2026.Feb.06` (the end date),
//! decides which window a batch belongs to, and which window is current.

use crate::errors::{AppError, AppResult};
use crate::models::sprint::{SprintWindow, parse_key};
use crate::models::ticket::NormalizedRecord;
use chrono::{Datelike, Month, NaiveDate, TimeDelta, Weekday};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

const LABEL_PATTERN: &str = r"(?i)sprint[._\s-]*(\d{4})[._\s-]+([a-z]{3,9}|\d{1,2})[._\s-]+(\d{1,2})\b";

static SPRINT_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(LABEL_PATTERN).ok());

/// Longest accepted sprint, in calendar days.
pub const MAX_SPRINT_LENGTH_DAYS: i64 = 366;

/// Setting name of the persisted user selection.
pub const SELECTED_SPRINT_SETTING: &str = "last_selected_sprint";

/// Extract the end date encoded in a sprint label.
pub fn parse_sprint_label(label: &str) -> Option<NaiveDate> {
    let re = SPRINT_LABEL.as_ref()?;
    let caps = re.captures(label)?;

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month_raw = caps.get(2)?.as_str();
    let month = match month_raw.parse::<u32>() {
        Ok(m) => m,
        Err(_) => month_raw.parse::<Month>().ok()?.number_from_month(),
    };
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Canonical label for a window ending on `end`.
pub fn canonical_label(end: NaiveDate) -> String {
    format!("Sprint.{}", end.format("%Y.%b.%d"))
}

/// How one batch was bucketed.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowResolution {
    /// Caller supplied the window; authoritative for the whole batch.
    Override(SprintWindow),
    /// Every labeled row agrees on one window.
    Inferred(SprintWindow),
    /// Rows disagree: nothing is picked, the caller chooses.
    Ambiguous(Vec<SprintWindow>),
    /// No row carries a parsable label.
    Unknown,
}

impl WindowResolution {
    pub fn window(&self) -> Option<&SprintWindow> {
        match self {
            WindowResolution::Override(w) | WindowResolution::Inferred(w) => Some(w),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SprintWindowResolver {
    sprint_length_days: i64,
}

impl Default for SprintWindowResolver {
    fn default() -> Self {
        Self::new(14)
    }
}

impl SprintWindowResolver {
    pub fn new(sprint_length_days: i64) -> Self {
        Self {
            sprint_length_days: sprint_length_days.clamp(1, MAX_SPRINT_LENGTH_DAYS),
        }
    }

    /// Window ending on `end`, starting `sprint_length_days - 1` days earlier.
    pub fn window_ending(&self, end: NaiveDate) -> AppResult<SprintWindow> {
        let start_date = TimeDelta::try_days(self.sprint_length_days - 1)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                AppError::InvalidWindow(format!(
                    "a {}-day sprint ending on {} starts before the first representable date",
                    self.sprint_length_days, end
                ))
            })?;

        Ok(SprintWindow {
            label: canonical_label(end),
            start_date,
            end_date: end,
        })
    }

    pub fn window_from_label(&self, label: &str) -> Option<SprintWindow> {
        parse_sprint_label(label).and_then(|end| self.window_ending(end).ok())
    }

    pub fn window_from_key(&self, key: &str) -> Option<SprintWindow> {
        parse_key(key).and_then(|end| self.window_ending(end).ok())
    }

    /// Explicit `{start, end}` pair supplied by the caller.
    pub fn override_window(&self, start: NaiveDate, end: NaiveDate) -> AppResult<SprintWindow> {
        SprintWindow::new(canonical_label(end), start, end).ok_or_else(|| {
            AppError::InvalidWindow(format!("start date {} is after end date {}", start, end))
        })
    }

    /// Distinct windows found in the batch, ordered by end date.
    pub fn discover(&self, records: &[NormalizedRecord]) -> Vec<SprintWindow> {
        let keys: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.sprint_key.as_deref())
            .collect();

        keys.into_iter()
            .filter_map(|k| self.window_from_key(k))
            .collect()
    }

    /// Decide the bucket of a batch. An override always wins.
    pub fn resolve_batch(
        &self,
        records: &[NormalizedRecord],
        override_window: Option<SprintWindow>,
    ) -> WindowResolution {
        if let Some(w) = override_window {
            return WindowResolution::Override(w);
        }

        let mut found = self.discover(records);
        match found.len() {
            0 => WindowResolution::Unknown,
            1 => WindowResolution::Inferred(found.remove(0)),
            _ => WindowResolution::Ambiguous(found),
        }
    }
}

/// The active window: smallest end date still `>= reference`, ties broken by
/// earliest start.
pub fn current_window(windows: &[SprintWindow], reference: NaiveDate) -> Option<&SprintWindow> {
    windows
        .iter()
        .filter(|w| w.end_date >= reference)
        .min_by(|a, b| a.cmp_activity(b))
}

/// Current window, or the most recent past one when every window has ended.
pub fn default_window(windows: &[SprintWindow], reference: NaiveDate) -> Option<&SprintWindow> {
    current_window(windows, reference).or_else(|| windows.iter().max_by(|a, b| a.cmp_activity(b)))
}

/// Resolve the window a read command works on: the persisted selection if it
/// is still a known window, otherwise the default one.
pub fn selected_window<'a>(
    windows: &'a [SprintWindow],
    persisted: Option<&str>,
    reference: NaiveDate,
) -> Option<&'a SprintWindow> {
    persisted
        .and_then(|key| windows.iter().find(|w| w.key() == key))
        .or_else(|| default_window(windows, reference))
}

/// Weekdays (Monday to Friday) from `today` to `end`, both included.
/// Zero once the window has ended.
pub fn working_days_left(today: NaiveDate, end: NaiveDate) -> i64 {
    today
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i64
}
