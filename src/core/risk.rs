//! Risk Rule Engine.
//!
//! Pure evaluation of the workload and at-risk predicates over a normalized
//! record set. Persistence of the audit trail lives in `core::alerts`.

use crate::models::alert::{AlertKind, AlertRecord};
use crate::models::ticket::{NormalizedRecord, Priority};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Anything that can tell whether an alert id was dismissed.
pub trait DismissalLookup {
    fn is_dismissed(&self, alert_id: &str) -> bool;
}

impl DismissalLookup for HashSet<String> {
    fn is_dismissed(&self, alert_id: &str) -> bool {
        self.contains(alert_id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskRules {
    /// `a > b` is evaluated as `a > b + tolerance_days`.
    pub tolerance_days: f64,
}

impl RiskRules {
    fn exceeds(&self, value: f64, estimate: f64) -> bool {
        value > estimate + self.tolerance_days
    }

    /// Every alert raised by one record, in kind order.
    pub fn alerts_for(&self, r: &NormalizedRecord, computed_at: NaiveDateTime) -> Vec<AlertRecord> {
        let mut out = Vec::new();
        let sp = r.story_points_days;
        let open = !r.status.is_done();

        let mut raise = |kind: AlertKind, details: String| {
            out.push(AlertRecord::new(
                kind,
                &r.key,
                computed_at,
                &r.assignee_first_name,
                details,
            ));
        };

        if self.exceeds(r.remaining_days, sp) {
            raise(
                AlertKind::WorkloadRemainingExceedsEstimate,
                format!("Rem: {:.1}d > SP: {:.1}d", r.remaining_days, sp),
            );
        }
        if self.exceeds(r.spent_days, sp) {
            raise(
                AlertKind::WorkloadSpentExceedsEstimate,
                format!("Spent: {:.1}d > SP: {:.1}d", r.spent_days, sp),
            );
        }
        if open && r.priority.is_urgent() {
            raise(
                AlertKind::AtRiskPriority,
                format!("Priority: {:?}, Status: {}", r.priority, r.raw_status),
            );
        }
        if open && self.exceeds(r.spent_days + r.remaining_days, sp) {
            raise(
                AlertKind::AtRiskBlowout,
                format!(
                    "Spent+Rem: {:.1}d > SP: {:.1}d",
                    r.spent_days + r.remaining_days,
                    sp
                ),
            );
        }

        out
    }

    /// Raw (pre-dismissal) alerts, sorted by kind then ticket key.
    pub fn raw_alerts(
        &self,
        records: &[NormalizedRecord],
        computed_at: NaiveDateTime,
    ) -> Vec<AlertRecord> {
        let mut alerts: Vec<AlertRecord> = records
            .iter()
            .filter(|r| !r.excluded)
            .flat_map(|r| self.alerts_for(r, computed_at))
            .collect();

        alerts.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.ticket_key.cmp(&b.ticket_key))
        });
        alerts
    }

    pub fn evaluate<D: DismissalLookup + ?Sized>(
        &self,
        records: &[NormalizedRecord],
        dismissals: &D,
        computed_at: NaiveDateTime,
    ) -> Evaluation {
        let raw = self.raw_alerts(records, computed_at);
        let (dismissed, visible): (Vec<AlertRecord>, Vec<AlertRecord>) = raw
            .iter()
            .cloned()
            .partition(|a| dismissals.is_dismissed(&a.id));

        Evaluation {
            raw,
            visible,
            dismissed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    /// Everything the rules raised; this is what the audit trail records.
    pub raw: Vec<AlertRecord>,
    /// Alerts shown to the user.
    pub visible: Vec<AlertRecord>,
    /// Raised again but previously dismissed.
    pub dismissed: Vec<AlertRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadLevel {
    Overloaded,
    HighLoad,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneeLoad {
    pub assignee: String,
    pub remaining_days: f64,
    pub limit_days: f64,
    pub level: LoadLevel,
}

/// Share of the limit above which an assignee is reported as high load.
const HIGH_LOAD_RATIO: f64 = 0.8;

/// Remaining work per assignee against their capacity. Sub-tasks are left
/// out since their parent already carries the estimate.
pub fn assignee_workload(
    records: &[NormalizedRecord],
    limit_days: f64,
    low_capacity: &[String],
) -> Vec<AssigneeLoad> {
    let mut per_assignee: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records.iter().filter(|r| !r.excluded && !r.is_subtask()) {
        let name = if r.assignee_first_name.is_empty() {
            "Unassigned"
        } else {
            r.assignee_first_name.as_str()
        };
        *per_assignee.entry(name).or_default() += r.remaining_days;
    }

    per_assignee
        .into_iter()
        .filter_map(|(assignee, days)| {
            let limit = if low_capacity.iter().any(|a| a.eq_ignore_ascii_case(assignee)) {
                limit_days / 2.0
            } else {
                limit_days
            };

            let level = if days > limit {
                LoadLevel::Overloaded
            } else if days > limit * HIGH_LOAD_RATIO {
                LoadLevel::HighLoad
            } else {
                return None;
            };

            Some(AssigneeLoad {
                assignee: assignee.to_string(),
                remaining_days: days,
                limit_days: limit,
                level,
            })
        })
        .collect()
}

/// Critical tickets with more than this much work left are flagged.
const CRITICAL_REMAINING_DAYS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalOverdue {
    pub key: String,
    pub summary: String,
    pub assignee: String,
    pub remaining_days: f64,
}

/// Critical-priority tickets with more than one day of work remaining.
pub fn critical_overdue(records: &[NormalizedRecord]) -> Vec<CriticalOverdue> {
    records
        .iter()
        .filter(|r| !r.excluded && r.priority == Priority::Critical)
        .filter(|r| r.remaining_days > CRITICAL_REMAINING_DAYS)
        .map(|r| CriticalOverdue {
            key: r.key.clone(),
            summary: r.summary.clone(),
            assignee: r.assignee_first_name.clone(),
            remaining_days: r.remaining_days,
        })
        .collect()
}
