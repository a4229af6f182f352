use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::metrics::sprint_metrics;
use crate::core::selection::resolve_window;
use crate::db::pool::DbPool;
use crate::db::queries::load_tickets;
use crate::errors::AppResult;
use crate::models::ticket::NormalizedRecord;
use crate::ui::messages::{header, info};
use crate::utils::colors::{color_for_status, paint};
use crate::utils::date;
use crate::utils::days2readable;
use crate::utils::formatting::truncate;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Tickets { sprint } = cmd {
        let pool = DbPool::open(&cfg.database)?;
        let window = resolve_window(&pool.conn, sprint.as_deref(), date::today())?;
        let records = load_tickets(&pool.conn, &window.key())?;

        header(format!(
            "{} ({} → {})",
            window.label, window.start_date, window.end_date
        ));

        if records.is_empty() {
            info("No tickets stored for this sprint.");
            return Ok(());
        }

        print!("{}", ticket_table(&records).render());

        let m = sprint_metrics(&records);
        println!(
            "\nStories: {}  points: {}  completed: {}  carry-over: {}",
            m.total_stories,
            days2readable(m.total_points),
            days2readable(m.completed_points),
            days2readable(m.carry_over_points)
        );
    }

    Ok(())
}

/// One row per normalized ticket.
pub fn ticket_table(records: &[NormalizedRecord]) -> Table {
    let mut table = Table::new(vec![
        Column::left("KEY"),
        Column::left("TYPE"),
        Column::left("STATUS"),
        Column::right("SP"),
        Column::right("SPENT"),
        Column::right("REM"),
        Column::left("PRIO"),
        Column::left("ASSIGNEE"),
        Column::left("SUMMARY"),
    ]);

    for r in records {
        table.add_row(vec![
            r.key.clone(),
            r.issue_type.clone(),
            paint(color_for_status(r.status), &r.raw_status),
            days2readable(r.story_points_days),
            days2readable(r.spent_days),
            days2readable(r.remaining_days),
            format!("{:?}", r.priority),
            r.assignee_first_name.clone(),
            truncate(&r.summary, 40),
        ]);
    }
    table
}
