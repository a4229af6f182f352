use crate::config::Config;
use crate::core::dismissals::DismissalStore;
use crate::core::metrics::{SubtaskMismatch, subtask_point_mismatches};
use crate::core::risk::{
    AssigneeLoad, CriticalOverdue, Evaluation, RiskRules, assignee_workload, critical_overdue,
};
use crate::core::sprint::working_days_left;
use crate::db::alerts::append_audit;
use crate::db::log::ttlog_quiet;
use crate::db::queries::load_tickets;
use crate::errors::{AppError, AppResult};
use crate::models::alert::{AlertKind, alert_id};
use crate::models::sprint::SprintWindow;
use chrono::NaiveDateTime;
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct AlertReport {
    pub window: SprintWindow,
    pub evaluation: Evaluation,
    pub workload: Vec<AssigneeLoad>,
    pub critical: Vec<CriticalOverdue>,
    pub subtask_mismatches: Vec<SubtaskMismatch>,
    pub working_days_left: i64,
}

pub struct AlertLogic;

impl AlertLogic {
    /// Evaluate the stored ticket set of `window`.
    ///
    /// Every raw alert is appended to the audit trail under the evaluation's
    /// calendar date, dismissed or not.
    pub fn evaluate(
        conn: &Connection,
        cfg: &Config,
        window: &SprintWindow,
        now: NaiveDateTime,
    ) -> AppResult<AlertReport> {
        let key = window.key();
        let records = load_tickets(conn, &key)?;
        let store = DismissalStore::open(conn)?;

        let rules = RiskRules {
            tolerance_days: cfg.estimate_tolerance_days,
        };
        let evaluation = rules.evaluate(&records, &store, now);

        append_audit(
            conn,
            now.date(),
            &now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            &key,
            &evaluation.raw,
        )?;

        let workload = assignee_workload(
            &records,
            cfg.workload_limit_days,
            &cfg.low_capacity_assignees,
        );

        Ok(AlertReport {
            window: window.clone(),
            evaluation,
            workload,
            critical: critical_overdue(&records),
            subtask_mismatches: subtask_point_mismatches(&records),
            working_days_left: working_days_left(now.date(), window.end_date),
        })
    }

    pub fn dismiss(conn: &Connection, id: &str, by: &str, remarks: &str) -> AppResult<()> {
        validate_alert_id(id)?;
        let mut store = DismissalStore::open(conn)?;
        store.dismiss(id, by, remarks)?;

        let msg = if remarks.is_empty() {
            format!("Alert dismissed by {}", by)
        } else {
            format!("Alert dismissed by {}: {}", by, remarks)
        };
        ttlog_quiet(conn, "dismiss", id, &msg);
        Ok(())
    }

    pub fn reset(conn: &Connection) -> AppResult<usize> {
        let mut store = DismissalStore::open(conn)?;
        let n = store.reset_all()?;
        ttlog_quiet(conn, "reset", "dismissals", &format!("{} dismissals cleared", n));
        Ok(n)
    }
}

/// An alert id is `<kind-code>:<ticket key>`.
fn validate_alert_id(id: &str) -> AppResult<()> {
    let valid = id
        .split_once(':')
        .and_then(|(code, ticket)| {
            AlertKind::from_code(code)
                .filter(|_| !ticket.trim().is_empty())
                .map(|k| alert_id(k, ticket) == id)
        })
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(AppError::UnknownAlert(id.to_string()))
    }
}
