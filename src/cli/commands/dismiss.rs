use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::alerts::AlertLogic;
use crate::core::dismissals::DismissalStore;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};
use std::env;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dismiss {
        id,
        remarks,
        by,
        list,
        reset,
    } = cmd
    {
        let pool = DbPool::open(&cfg.database)?;

        if *reset {
            let n = AlertLogic::reset(&pool.conn)?;
            success(format!("{} dismissal(s) cleared", n));
            return Ok(());
        }

        if *list {
            let store = DismissalStore::open(&pool.conn)?;
            if store.is_empty() {
                info("No dismissed alerts.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("ID"),
                Column::left("DISMISSED AT"),
                Column::left("BY"),
                Column::left("REMARKS"),
            ]);
            for e in store.entries() {
                table.add_row(vec![
                    e.alert_id.clone(),
                    e.dismissed_at.clone(),
                    e.dismissed_by.clone(),
                    e.remarks.clone(),
                ]);
            }
            print!("{}", table.render());
            return Ok(());
        }

        if let Some(id) = id {
            let by = by.clone().unwrap_or_else(current_user);
            AlertLogic::dismiss(&pool.conn, id.trim(), &by, remarks)?;
            success(format!("Alert {} dismissed", id.trim()));
        }
    }

    Ok(())
}

/// Login name of the OS user, `user` when unknown.
fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "user".to_string())
}
