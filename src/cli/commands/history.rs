use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history::{HistoryAccumulator, ideal_burndown};
use crate::core::selection::resolve_window;
use crate::core::sprint::working_days_left;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::date::{self, parse_date_arg};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { sprint, delete } = cmd {
        let pool = DbPool::open(&cfg.database)?;
        let window = resolve_window(&pool.conn, sprint.as_deref(), date::today())?;
        let key = window.key();
        let history = HistoryAccumulator::new(&pool.conn);

        if let Some(raw) = delete {
            let day = parse_date_arg(raw)?;
            history.delete(&key, day)?;
            ttlog_quiet(
                &pool.conn,
                "history_delete",
                &key,
                &format!("Deleted snapshot of {}", day),
            );
            success(format!("Snapshot of {} removed from sprint {}", day, key));
            return Ok(());
        }

        let series = history.series(&key)?;

        header(format!(
            "BURNDOWN {} ({} → {})",
            window.label, window.start_date, window.end_date
        ));
        info(format!(
            "Working days left: {}",
            working_days_left(date::today(), window.end_date)
        ));

        if series.is_empty() {
            info("No snapshots recorded for this sprint.");
            return Ok(());
        }

        let ideal = ideal_burndown(&window, &series);

        let mut table = Table::new(vec![
            Column::left("DATE"),
            Column::right("REMAINING"),
            Column::right("IDEAL"),
            Column::right("OPEN"),
            Column::right("DONE"),
        ]);

        for s in &series {
            let ideal_value = ideal
                .map(|l| format!("{:.1}", l.value_at(s.snapshot_date)))
                .unwrap_or_default();
            table.add_row(vec![
                s.snapshot_date.to_string(),
                format!("{:.1}", s.total_remaining_days),
                ideal_value,
                s.remaining_task_count.to_string(),
                s.completed_task_count.to_string(),
            ]);
        }

        print!("{}", table.render());
    }

    Ok(())
}
