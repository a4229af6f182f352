#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use sprintpulse::db::pool::DbPool;
use sprintpulse::models::ticket::RawTicketRow;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn sp() -> Command {
    cargo_bin_cmd!("sprintpulse")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_sprintpulse.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Open a fresh, migrated database for library-level tests
pub fn open_test_db(name: &str) -> DbPool {
    let db_path = setup_test_db(name);
    DbPool::open(&db_path).expect("open test db")
}

pub const HEADER: &str = "Issue key,Summary,Issue Type,Status,Priority,Assignee,Custom field (Story Points),Remaining Estimate,Time Spent,Sprint,Sprint";

/// Write a tracker-like CSV export (header + rows) to the temp dir
pub fn write_csv(name: &str, rows: &[&str]) -> String {
    let path = temp_out(&format!("{}_input", name), "csv");
    let mut content = String::from(HEADER);
    for r in rows {
        content.push('\n');
        content.push_str(r);
    }
    content.push('\n');
    fs::write(&path, content).expect("write csv");
    path
}

/// Small batch of the `Sprint.2026.Feb.06` sprint.
///
/// - FEB-1: To Do, Blocker → priority alert
/// - FEB-2: In Progress, 6d remaining on 5 SP → rem > sp + blowout
/// - FEB-3: Done
/// - FEB-4: assigned to the excluded assignee (Zoe)
pub fn feb_rows() -> Vec<&'static str> {
    vec![
        "FEB-1,Login page,Story,To Do,Blocker,Anna Rossi,3,,,Sprint.2026.Feb.06,",
        "FEB-2,Search API,Story,In Progress,Major,Marco Bianchi,5,172800,0,Sprint.2026.Feb.06,",
        "FEB-3,Fix typo,Bug,Done,Minor,Anna Rossi,1,,,Sprint.2026.Jan.23,Sprint.2026.Feb.06",
        "FEB-4,Spike,Story,In Progress,Critical,Zoe Verdi,2,57600,57600,Sprint.2026.Feb.06,",
    ]
}

/// Initialize DB via CLI and ingest the February batch
pub fn init_db_with_data(db_path: &str, name: &str) {
    sp().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    let csv = write_csv(name, &feb_rows());
    sp().args([
        "--db",
        db_path,
        "ingest",
        &csv,
        "--snapshot-date",
        "2026-01-26",
        "--exclude",
        "Zoe",
    ])
    .assert()
    .success();
}

pub fn row(pairs: &[(&str, &str)]) -> RawTicketRow {
    RawTicketRow::from_pairs(pairs.iter().copied())
}
