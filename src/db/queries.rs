use crate::errors::{AppError, AppResult};
use crate::models::snapshot::HistorySnapshot;
use crate::models::sprint::{KEY_FORMAT, SprintWindow};
use crate::models::ticket::{NormalizedRecord, Priority, TicketStatus};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn parse_db_date(raw: &str, col: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, KEY_FORMAT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            col,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.to_string())),
        )
    })
}

fn fmt_date(d: &NaiveDate) -> String {
    d.format(KEY_FORMAT).to_string()
}

// ---------------------------
// Sprint windows
// ---------------------------

fn map_window(row: &Row) -> rusqlite::Result<SprintWindow> {
    let start: String = row.get("start_date")?;
    let end: String = row.get("end_date")?;
    Ok(SprintWindow {
        label: row.get("label")?,
        start_date: parse_db_date(&start, 2)?,
        end_date: parse_db_date(&end, 3)?,
    })
}

/// Insert or refresh a window in the registry.
///
/// Returns the previous start date when an existing window got a new one.
pub fn upsert_window(conn: &Connection, w: &SprintWindow) -> AppResult<Option<NaiveDate>> {
    let previous = load_window(conn, &w.key())?
        .map(|old| old.start_date)
        .filter(|start| *start != w.start_date);

    conn.execute(
        "INSERT INTO sprint_windows (sprint_key, label, start_date, end_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(sprint_key) DO UPDATE SET
            label = excluded.label,
            start_date = excluded.start_date,
            end_date = excluded.end_date",
        params![
            w.key(),
            w.label,
            fmt_date(&w.start_date),
            fmt_date(&w.end_date),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(previous)
}

pub fn load_windows(conn: &Connection) -> AppResult<Vec<SprintWindow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT sprint_key, label, start_date, end_date FROM sprint_windows
         ORDER BY end_date ASC, start_date ASC",
    )?;
    let rows = stmt.query_map([], map_window)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_window(conn: &Connection, sprint_key: &str) -> AppResult<Option<SprintWindow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT sprint_key, label, start_date, end_date FROM sprint_windows
         WHERE sprint_key = ?1",
    )?;
    Ok(stmt.query_row([sprint_key], map_window).optional()?)
}

// ---------------------------
// Tickets (latest normalized batch per window)
// ---------------------------

fn map_ticket(row: &Row) -> rusqlite::Result<NormalizedRecord> {
    let status_str: String = row.get("status")?;
    let status = TicketStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid status: {}", status_str))),
        )
    })?;

    let prio_str: String = row.get("priority")?;
    let priority = Priority::from_db_str(&prio_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("Invalid priority: {}", prio_str))),
        )
    })?;

    Ok(NormalizedRecord {
        key: row.get("key")?,
        status,
        raw_status: row.get("raw_status")?,
        story_points_days: row.get("story_points_days")?,
        remaining_days: row.get("remaining_days")?,
        spent_days: row.get("spent_days")?,
        priority,
        assignee_first_name: row.get("assignee")?,
        excluded: false,
        summary: row.get("summary")?,
        issue_type: row.get("issue_type")?,
        sprint_key: row.get("row_sprint_key")?,
        parent_key: row.get("parent_key")?,
    })
}

/// Replace the stored ticket set of a window with `records`.
/// Excluded records are never stored.
pub fn replace_tickets(
    conn: &Connection,
    sprint_key: &str,
    records: &[NormalizedRecord],
) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute("DELETE FROM tickets WHERE sprint_key = ?1", [sprint_key])?;

    {
        let mut stmt = tx.prepare_cached(
            "INSERT OR REPLACE INTO tickets (
                sprint_key, key, status, raw_status, story_points_days, remaining_days,
                spent_days, priority, assignee, summary, issue_type, row_sprint_key,
                parent_key)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )?;

        for r in records.iter().filter(|r| !r.excluded) {
            stmt.execute(params![
                sprint_key,
                r.key,
                r.status.to_db_str(),
                r.raw_status,
                r.story_points_days,
                r.remaining_days,
                r.spent_days,
                r.priority.to_db_str(),
                r.assignee_first_name,
                r.summary,
                r.issue_type,
                r.sprint_key,
                r.parent_key,
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}

pub fn load_tickets(conn: &Connection, sprint_key: &str) -> AppResult<Vec<NormalizedRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM tickets WHERE sprint_key = ?1 ORDER BY key ASC",
    )?;
    let rows = stmt.query_map([sprint_key], map_ticket)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Burndown snapshots
// ---------------------------

fn map_snapshot(row: &Row) -> rusqlite::Result<HistorySnapshot> {
    let date: String = row.get("snapshot_date")?;
    Ok(HistorySnapshot {
        sprint_key: row.get("sprint_key")?,
        snapshot_date: parse_db_date(&date, 1)?,
        total_remaining_days: row.get("total_remaining_days")?,
        remaining_task_count: row.get("remaining_task_count")?,
        completed_task_count: row.get("completed_task_count")?,
    })
}

/// Insert a snapshot, overwriting the one with the same `(sprint_key, snapshot_date)`.
/// Returns `true` when an existing entry was replaced.
pub fn upsert_snapshot(conn: &Connection, s: &HistorySnapshot) -> AppResult<bool> {
    let date = fmt_date(&s.snapshot_date);
    let tx = conn.unchecked_transaction()?;

    let existed = tx
        .query_row(
            "SELECT 1 FROM snapshots WHERE sprint_key = ?1 AND snapshot_date = ?2",
            params![s.sprint_key, date],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    tx.execute(
        "INSERT INTO snapshots (
            sprint_key, snapshot_date, total_remaining_days,
            remaining_task_count, completed_task_count, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(sprint_key, snapshot_date) DO UPDATE SET
            total_remaining_days = excluded.total_remaining_days,
            remaining_task_count = excluded.remaining_task_count,
            completed_task_count = excluded.completed_task_count,
            updated_at = excluded.updated_at",
        params![
            s.sprint_key,
            date,
            s.total_remaining_days,
            s.remaining_task_count,
            s.completed_task_count,
            Local::now().to_rfc3339(),
        ],
    )?;

    tx.commit()?;
    Ok(existed)
}

pub fn load_snapshots(conn: &Connection, sprint_key: &str) -> AppResult<Vec<HistorySnapshot>> {
    let mut stmt = conn.prepare_cached(
        "SELECT sprint_key, snapshot_date, total_remaining_days,
                remaining_task_count, completed_task_count
         FROM snapshots
         WHERE sprint_key = ?1
         ORDER BY snapshot_date ASC",
    )?;
    let rows = stmt.query_map([sprint_key], map_snapshot)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Returns the number of deleted rows (0 or 1).
pub fn delete_snapshot(conn: &Connection, sprint_key: &str, date: &NaiveDate) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM snapshots WHERE sprint_key = ?1 AND snapshot_date = ?2",
        params![sprint_key, fmt_date(date)],
    )?;
    Ok(n)
}

// ---------------------------
// Settings
// ---------------------------

pub fn get_setting(conn: &Connection, name: &str) -> AppResult<Option<String>> {
    let mut stmt = conn.prepare_cached("SELECT value FROM settings WHERE name = ?1")?;
    Ok(stmt.query_row([name], |row| row.get(0)).optional()?)
}

pub fn set_setting(conn: &Connection, name: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (name, value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        params![name, value],
    )?;
    Ok(())
}
