// src/export/logic.rs

use crate::config::Config;
use crate::core::alerts::AlertLogic;
use crate::core::history::{HistoryAccumulator, ideal_burndown};
use crate::core::selection::resolve_window;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{AlertExport, ExportRow, HistoryExport};
use crate::export::xlsx::export_xlsx;
use crate::export::{ExportFormat, ExportTarget};
use crate::models::sprint::SprintWindow;
use crate::ui::messages::warning;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::Path;

/// Everything one export run needs.
pub struct ExportRequest<'a> {
    pub target: ExportTarget,
    pub format: ExportFormat,
    pub file: &'a str,
    pub sprint: Option<&'a str>,
    pub force: bool,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export the history or the alerts of one sprint window.
    ///
    /// Returns the number of exported rows. The output path must be absolute.
    pub fn export(
        pool: &DbPool,
        cfg: &Config,
        req: &ExportRequest<'_>,
        now: NaiveDateTime,
    ) -> AppResult<usize> {
        let path = Path::new(req.file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {}",
                req.file
            )));
        }

        ensure_writable(path, req.force)?;

        let window = resolve_window(&pool.conn, req.sprint, now.date())?;

        match req.target {
            ExportTarget::History => {
                let rows = load_history(&pool.conn, &window)?;
                write_rows(&rows, req.format, "History", path)
            }
            ExportTarget::Alerts => {
                let rows = load_alerts(&pool.conn, cfg, &window, now)?;
                write_rows(&rows, req.format, "Alerts", path)
            }
        }
    }
}

fn write_rows<T: ExportRow>(
    rows: &[T],
    format: ExportFormat,
    sheet: &str,
    path: &Path,
) -> AppResult<usize> {
    if rows.is_empty() {
        warning("No rows found for the selected sprint window.");
    }

    match format {
        ExportFormat::Csv => export_csv(rows, path)?,
        ExportFormat::Json => export_json(rows, path)?,
        ExportFormat::Xlsx => export_xlsx(rows, sheet, path)?,
    }

    Ok(rows.len())
}

/// Snapshot series of a window with the ideal value of each day.
pub fn load_history(conn: &Connection, window: &SprintWindow) -> AppResult<Vec<HistoryExport>> {
    let snapshots = HistoryAccumulator::new(conn).series(&window.key())?;
    let ideal = ideal_burndown(window, &snapshots);

    Ok(snapshots
        .iter()
        .map(|s| HistoryExport::from_snapshot(s, ideal.as_ref()))
        .collect())
}

/// Current alerts of a window, dismissed ones included and flagged.
///
/// This is an evaluation run like `alerts`: the raw set lands in the audit trail.
pub fn load_alerts(
    conn: &Connection,
    cfg: &Config,
    window: &SprintWindow,
    now: NaiveDateTime,
) -> AppResult<Vec<AlertExport>> {
    let eval = AlertLogic::evaluate(conn, cfg, window, now)?.evaluation;

    Ok(eval
        .raw
        .iter()
        .map(|a| AlertExport::from_alert(a, eval.dismissed.iter().any(|d| d.id == a.id)))
        .collect())
}
