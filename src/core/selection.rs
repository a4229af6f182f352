//! Which sprint window a read command works on.

use crate::core::sprint::{SELECTED_SPRINT_SETTING, selected_window};
use crate::db::log::ttlog_quiet;
use crate::db::queries::{get_setting, load_window, load_windows, set_setting};
use crate::errors::{AppError, AppResult};
use crate::models::sprint::SprintWindow;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Explicit key → persisted selection (if still known) → current window →
/// most recent window.
pub fn resolve_window(
    conn: &Connection,
    explicit: Option<&str>,
    today: NaiveDate,
) -> AppResult<SprintWindow> {
    if let Some(key) = explicit {
        return load_window(conn, key.trim())?
            .ok_or_else(|| AppError::UnknownSprint(key.to_string()));
    }

    let windows = load_windows(conn)?;
    let persisted = get_setting(conn, SELECTED_SPRINT_SETTING)?;

    selected_window(&windows, persisted.as_deref(), today)
        .cloned()
        .ok_or(AppError::NoSprintWindow)
}

/// Remember the user's pick across sessions.
pub fn select_window(conn: &Connection, key: &str) -> AppResult<SprintWindow> {
    let window =
        load_window(conn, key.trim())?.ok_or_else(|| AppError::UnknownSprint(key.to_string()))?;
    set_setting(conn, SELECTED_SPRINT_SETTING, &window.key())?;
    ttlog_quiet(conn, "select", &window.key(), "Selected sprint window");
    Ok(window)
}

pub fn persisted_selection(conn: &Connection) -> AppResult<Option<String>> {
    get_setting(conn, SELECTED_SPRINT_SETTING)
}
