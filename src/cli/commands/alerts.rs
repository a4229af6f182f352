use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::alerts::AlertLogic;
use crate::core::risk::LoadLevel;
use crate::core::selection::resolve_window;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::alert::AlertRecord;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREY, RED, color_for_alert, color_for_load, paint};
use crate::utils::date;
use crate::utils::days2readable;
use crate::utils::formatting::truncate;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Alerts { sprint, all } = cmd {
        let pool = DbPool::open(&cfg.database)?;
        let now = date::now();
        let window = resolve_window(&pool.conn, sprint.as_deref(), now.date())?;

        let report = AlertLogic::evaluate(&pool.conn, cfg, &window, now)?;
        let eval = &report.evaluation;

        header(format!(
            "ALERTS {} ({} → {})",
            window.label, window.start_date, window.end_date
        ));
        info(format!("Working days left: {}", report.working_days_left));

        if eval.visible.is_empty() {
            success("No open alerts.");
        } else {
            print!("{}", alert_table(&eval.visible, None).render());
        }

        if !eval.dismissed.is_empty() {
            if *all {
                println!("\nDismissed:");
                print!("{}", alert_table(&eval.dismissed, Some(GREY)).render());
            } else {
                info(format!(
                    "{} dismissed alert(s) hidden, use --all to show them",
                    eval.dismissed.len()
                ));
            }
        }

        if !report.workload.is_empty() {
            println!("\nWorkload:");
            let mut table = Table::new(vec![
                Column::left("ASSIGNEE"),
                Column::right("REMAINING"),
                Column::right("LIMIT"),
                Column::left("LEVEL"),
            ]);
            for l in &report.workload {
                let level = match l.level {
                    LoadLevel::Overloaded => "Overloaded",
                    LoadLevel::HighLoad => "High load",
                };
                table.add_row(vec![
                    l.assignee.clone(),
                    days2readable(l.remaining_days),
                    days2readable(l.limit_days),
                    paint(color_for_load(l.level), level),
                ]);
            }
            print!("{}", table.render());
        }

        if !report.critical.is_empty() {
            println!("\nCritical with more than 1 day left:");
            let mut table = Table::new(vec![
                Column::left("KEY"),
                Column::left("ASSIGNEE"),
                Column::right("REMAINING"),
                Column::left("SUMMARY"),
            ]);
            for c in &report.critical {
                table.add_row(vec![
                    paint(RED, &c.key),
                    c.assignee.clone(),
                    days2readable(c.remaining_days),
                    truncate(&c.summary, 40),
                ]);
            }
            print!("{}", table.render());
        }

        if !report.subtask_mismatches.is_empty() {
            println!("\nSub-task points not matching their story:");
            let mut table = Table::new(vec![
                Column::left("STORY"),
                Column::right("STORY SP"),
                Column::right("SUB-TASK SP"),
            ]);
            for m in &report.subtask_mismatches {
                table.add_row(vec![
                    m.parent_key.clone(),
                    days2readable(m.parent_points),
                    days2readable(m.subtask_points),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}

fn alert_table(alerts: &[AlertRecord], color: Option<&str>) -> Table {
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("ALERT"),
        Column::left("ASSIGNEE"),
        Column::left("DETAILS"),
    ]);

    for a in alerts {
        let c = color.unwrap_or_else(|| color_for_alert(a.kind));
        table.add_row(vec![
            a.id.clone(),
            paint(c, a.kind.label()),
            a.assignee.clone(),
            a.details.clone(),
        ]);
    }
    table
}
