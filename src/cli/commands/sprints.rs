use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::selection::{persisted_selection, select_window};
use crate::core::sprint::current_window;
use crate::db::pool::DbPool;
use crate::db::queries::load_windows;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::date;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sprints { select } = cmd {
        let pool = DbPool::open(&cfg.database)?;

        if let Some(key) = select {
            let w = select_window(&pool.conn, key)?;
            success(format!("Selected sprint {} ({})", w.key(), w.label));
            return Ok(());
        }

        let windows = load_windows(&pool.conn)?;
        if windows.is_empty() {
            info("No sprint windows recorded yet. Run `ingest` first.");
            return Ok(());
        }

        let today = date::today();
        let current = current_window(&windows, today).map(|w| w.key());
        let selected = persisted_selection(&pool.conn)?;

        let mut table = Table::new(vec![
            Column::left("KEY"),
            Column::left("LABEL"),
            Column::left("START"),
            Column::left("END"),
            Column::left(""),
        ]);

        for w in &windows {
            let key = w.key();
            let mut marks = Vec::new();
            if current.as_deref() == Some(key.as_str()) {
                marks.push("current");
            }
            if selected.as_deref() == Some(key.as_str()) {
                marks.push("selected");
            }
            table.add_row(vec![
                key.clone(),
                w.label.clone(),
                w.start_date.to_string(),
                w.end_date.to_string(),
                marks.join(", "),
            ]);
        }

        println!("📅 Sprint windows:\n");
        print!("{}", table.render());
    }

    Ok(())
}
