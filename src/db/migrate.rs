use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists. Applied migrations are recorded there,
/// so it has to exist before anything else runs.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260105_0001_sprint_windows",
        description: "Created sprint_windows registry",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sprint_windows (
            sprint_key  TEXT PRIMARY KEY,
            label       TEXT NOT NULL,
            start_date  TEXT NOT NULL,
            end_date    TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            CHECK (start_date <= end_date)
        );
        "#,
    },
    Migration {
        version: "20260105_0002_snapshots",
        description: "Created burndown snapshots table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            sprint_key            TEXT NOT NULL,
            snapshot_date         TEXT NOT NULL,
            total_remaining_days  REAL NOT NULL,
            remaining_task_count  INTEGER NOT NULL,
            completed_task_count  INTEGER NOT NULL,
            updated_at            TEXT NOT NULL,
            PRIMARY KEY (sprint_key, snapshot_date)
        );
        "#,
    },
    Migration {
        version: "20260105_0003_tickets",
        description: "Created normalized tickets table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS tickets (
            sprint_key         TEXT NOT NULL,
            key                TEXT NOT NULL,
            status             TEXT NOT NULL,
            raw_status         TEXT NOT NULL DEFAULT '',
            story_points_days  REAL NOT NULL,
            remaining_days     REAL NOT NULL,
            spent_days         REAL NOT NULL,
            priority           TEXT NOT NULL,
            assignee           TEXT NOT NULL DEFAULT '',
            summary            TEXT NOT NULL DEFAULT '',
            issue_type         TEXT NOT NULL DEFAULT '',
            row_sprint_key     TEXT,
            PRIMARY KEY (sprint_key, key)
        );
        "#,
    },
    Migration {
        version: "20260105_0004_dismissals",
        description: "Created alert dismissals table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS dismissals (
            alert_id      TEXT PRIMARY KEY,
            dismissed_at  TEXT NOT NULL,
            remarks       TEXT NOT NULL DEFAULT ''
        );
        "#,
    },
    Migration {
        version: "20260105_0005_alert_audit",
        description: "Created alert audit trail",
        sql: r#"
        CREATE TABLE IF NOT EXISTS alert_audit (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            eval_date     TEXT NOT NULL,
            evaluated_at  TEXT NOT NULL,
            sprint_key    TEXT NOT NULL,
            alert_id      TEXT NOT NULL,
            kind          TEXT NOT NULL,
            ticket_key    TEXT NOT NULL,
            assignee      TEXT NOT NULL DEFAULT '',
            details       TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_alert_audit_eval_date ON alert_audit(eval_date);
        "#,
    },
    Migration {
        version: "20260105_0006_settings",
        description: "Created settings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS settings (
            name   TEXT PRIMARY KEY,
            value  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260212_0007_tickets_parent_key",
        description: "Added parent_key to tickets",
        sql: r#"
        ALTER TABLE tickets ADD COLUMN parent_key TEXT;
        "#,
    },
    Migration {
        version: "20260212_0008_dismissals_dismissed_by",
        description: "Added dismissed_by to dismissals",
        sql: r#"
        ALTER TABLE dismissals ADD COLUMN dismissed_by TEXT NOT NULL DEFAULT '';
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db(). Quiet when nothing is pending, so
/// every command can call it on open.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}
