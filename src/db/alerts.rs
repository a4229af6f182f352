//! Dismissals and the raw alert audit trail.
//!
//! The two tables are deliberately separate: dismissals filter what is shown,
//! the audit trail records every evaluation as it was computed.

use crate::errors::AppResult;
use crate::models::alert::{AlertRecord, AuditEntry, DismissalEntry};
use chrono::NaiveDate;
use rusqlite::{Connection, params};

pub fn load_dismissals(conn: &Connection) -> AppResult<Vec<DismissalEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT alert_id, dismissed_at, dismissed_by, remarks FROM dismissals
         ORDER BY alert_id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(DismissalEntry {
            alert_id: row.get(0)?,
            dismissed_at: row.get(1)?,
            dismissed_by: row.get(2)?,
            remarks: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_dismissal(conn: &Connection, entry: &DismissalEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO dismissals (alert_id, dismissed_at, dismissed_by, remarks)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(alert_id) DO UPDATE SET
            dismissed_at = excluded.dismissed_at,
            dismissed_by = excluded.dismissed_by,
            remarks = excluded.remarks",
        params![entry.alert_id, entry.dismissed_at, entry.dismissed_by, entry.remarks],
    )?;
    Ok(())
}

/// Returns the number of removed dismissals.
pub fn clear_dismissals(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM dismissals", [])?)
}

/// Append one evaluation run to the audit trail. Never deduplicated.
pub fn append_audit(
    conn: &Connection,
    eval_date: NaiveDate,
    evaluated_at: &str,
    sprint_key: &str,
    alerts: &[AlertRecord],
) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO alert_audit (
                eval_date, evaluated_at, sprint_key, alert_id, kind, ticket_key, assignee, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        let day = eval_date.format("%Y-%m-%d").to_string();
        for a in alerts {
            stmt.execute(params![
                day,
                evaluated_at,
                sprint_key,
                a.id,
                a.kind.code(),
                a.ticket_key,
                a.assignee,
                a.details,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn load_audit(conn: &Connection, eval_date: NaiveDate) -> AppResult<Vec<AuditEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT eval_date, evaluated_at, sprint_key, alert_id, kind, ticket_key, assignee, details
         FROM alert_audit
         WHERE eval_date = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([eval_date.format("%Y-%m-%d").to_string()], |row| {
        Ok(AuditEntry {
            eval_date: row.get(0)?,
            evaluated_at: row.get(1)?,
            sprint_key: row.get(2)?,
            alert_id: row.get(3)?,
            kind: row.get(4)?,
            ticket_key: row.get(5)?,
            assignee: row.get(6)?,
            details: row.get(7)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
