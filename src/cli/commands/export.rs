use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportRequest};
use crate::ui::messages::info;
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        what,
        format,
        file,
        sprint,
        force,
    } = cmd
    {
        let pool = DbPool::open(&cfg.database)?;
        let req = ExportRequest {
            target: *what,
            format: *format,
            file,
            sprint: sprint.as_deref(),
            force: *force,
        };
        let n = ExportLogic::export(&pool, cfg, &req, date::now())?;
        info(format!(
            "{} {} row(s) written as {}",
            n,
            what.as_str(),
            format.as_str()
        ));
    }
    Ok(())
}
