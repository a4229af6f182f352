use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::alerts::load_audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::date::{self, parse_optional_date};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Audit { date: day } = cmd {
        let pool = DbPool::open(&cfg.database)?;
        let day = parse_optional_date(day.as_ref())?.unwrap_or_else(date::today);
        let entries = load_audit(&pool.conn, day)?;

        header(format!("ALERT AUDIT {}", day));

        if entries.is_empty() {
            info("No alerts were evaluated on this day.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::left("EVALUATED AT"),
            Column::left("SPRINT"),
            Column::left("ID"),
            Column::left("ASSIGNEE"),
            Column::left("DETAILS"),
        ]);
        for e in &entries {
            table.add_row(vec![
                e.evaluated_at.clone(),
                e.sprint_key.clone(),
                e.alert_id.clone(),
                e.assignee.clone(),
                e.details.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
