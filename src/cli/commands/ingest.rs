use crate::cli::commands::tickets::ticket_table;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history::UpsertOutcome;
use crate::core::ingest::{IngestLogic, IngestReport, IngestRequest};
use crate::core::sprint::{SprintWindowResolver, WindowResolution};
use crate::db::pool::DbPool;
use crate::db::queries::load_window;
use crate::errors::{AppError, AppResult};
use crate::import::read_csv;
use crate::models::sprint::SprintWindow;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::{self, parse_date_arg, parse_optional_date};
use crate::utils::days2readable;
use rusqlite::Connection;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Ingest {
        file,
        start,
        end,
        sprint,
        snapshot_date,
        exclude,
    } = cmd
    {
        let pool = DbPool::open(&cfg.database)?;
        let resolver = SprintWindowResolver::new(cfg.sprint_length_days);

        let override_window = explicit_window(
            &pool.conn,
            &resolver,
            sprint.as_deref(),
            start.as_deref(),
            end.as_deref(),
        )?;

        let rows = read_csv(Path::new(file))?;
        info(format!("Read {} row(s) from {}", rows.len(), file));

        let req = IngestRequest {
            rows,
            override_window,
            snapshot_date: parse_optional_date(snapshot_date.as_ref())?,
            excluded_assignee: exclude
                .clone()
                .unwrap_or_else(|| cfg.excluded_assignee.clone()),
        };

        let report = IngestLogic::apply(&pool.conn, &resolver, req, date::today())?;
        print_report(&report);
    }

    Ok(())
}

/// Window given on the command line, if any.
fn explicit_window(
    conn: &Connection,
    resolver: &SprintWindowResolver,
    sprint: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> AppResult<Option<SprintWindow>> {
    if let Some(key) = sprint {
        let known = load_window(conn, key.trim())?;
        return known
            .or_else(|| resolver.window_from_key(key))
            .map(Some)
            .ok_or_else(|| AppError::InvalidWindow(format!("not a sprint key: {}", key)));
    }

    match (start, end) {
        (Some(s), Some(e)) => {
            let w = resolver.override_window(parse_date_arg(s)?, parse_date_arg(e)?)?;
            Ok(Some(w))
        }
        (None, Some(e)) => Ok(Some(resolver.window_ending(parse_date_arg(e)?)?)),
        _ => Ok(None),
    }
}

fn print_report(report: &IngestReport) {
    let s = &report.stats;

    header("INGEST");
    println!(
        "Rows: {}  accepted: {}  excluded: {}  without key: {}  duplicates: {}",
        s.rows_seen, s.accepted, s.excluded, s.missing_key, s.duplicate_keys
    );
    if s.defaulted_fields > 0 || s.unknown_status > 0 {
        warning(format!(
            "{} malformed numeric field(s) defaulted to 0, {} unknown status value(s)",
            s.defaulted_fields, s.unknown_status
        ));
    }

    let m = &report.metrics;
    println!(
        "Stories: {}  points: {}  completed: {}  carry-over: {}",
        m.total_stories,
        days2readable(m.total_points),
        days2readable(m.completed_points),
        days2readable(m.carry_over_points)
    );

    if !report.discovered.is_empty() {
        let keys: Vec<String> = report.discovered.iter().map(|w| w.key()).collect();
        info(format!("Sprint labels found: {}", keys.join(", ")));
    }

    match &report.resolution {
        WindowResolution::Ambiguous(found) => {
            print_unbucketed(report);
            warning(format!(
                "The batch spans {} sprint windows; nothing was recorded.",
                found.len()
            ));
            info("Re-run with --sprint KEY or --start/--end to choose the window.");
        }
        WindowResolution::Unknown => {
            print_unbucketed(report);
            warning("No sprint label found in the batch; nothing was recorded.");
            info("Re-run with --sprint KEY or --start/--end to choose the window.");
        }
        WindowResolution::Override(w) | WindowResolution::Inferred(w) => {
            if let Some(old) = report.previous_start {
                warning(format!(
                    "Sprint {} already started on {}; start moved to {}. The ideal burndown of recorded history changes too.",
                    w.key(),
                    old,
                    w.start_date
                ));
            }
            if let (Some(snap), Some(outcome)) = (&report.snapshot, report.outcome) {
                let verb = match outcome {
                    UpsertOutcome::Inserted => "recorded",
                    UpsertOutcome::Replaced => "replaced",
                };
                success(format!(
                    "Snapshot {} for {} ({} → {}) on {}: {} remaining, {} open / {} done",
                    verb,
                    w.label,
                    w.start_date,
                    w.end_date,
                    snap.snapshot_date,
                    days2readable(snap.total_remaining_days),
                    snap.remaining_task_count,
                    snap.completed_task_count
                ));
                if !w.contains(snap.snapshot_date) {
                    warning(format!(
                        "Snapshot date {} is outside the sprint window.",
                        snap.snapshot_date
                    ));
                }
            }
        }
    }
}

/// Records of a batch that was not bucketed, shown so the user can pick a window.
fn print_unbucketed(report: &IngestReport) {
    if !report.records.is_empty() {
        println!();
        print!("{}", ticket_table(&report.records).render());
    }
}
