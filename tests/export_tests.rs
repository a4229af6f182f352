mod common;
use common::{init_db_with_data, setup_test_db, sp, temp_out};
use predicates::str::contains;
use sprintpulse::db::alerts::load_audit;
use sprintpulse::db::pool::DbPool;
use sprintpulse::utils::date;
use std::fs;

#[test]
fn test_export_history_csv() {
    let db_path = setup_test_db("export_history_csv");
    init_db_with_data(&db_path, "export_history_csv");

    let out = temp_out("export_history_csv", "csv");

    sp().args([
        "--db", &db_path, "export", "--what", "history", "--format", "csv", "--file", &out,
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some(
            "sprint_key,snapshot_date,total_remaining_days,remaining_task_count,completed_task_count,ideal_remaining_days"
        )
    );
    let row = lines.next().expect("one snapshot row");
    assert!(row.starts_with("2026-02-06,2026-01-26,9.0,2,1,"));
}

#[test]
fn test_export_alerts_json_flags_dismissed() {
    let db_path = setup_test_db("export_alerts_json");
    init_db_with_data(&db_path, "export_alerts_json");

    sp().args(["--db", &db_path, "dismiss", "rem-gt-sp:FEB-2"])
        .assert()
        .success();

    let out = temp_out("export_alerts_json", "json");
    sp().args([
        "--db", &db_path, "export", "--what", "alerts", "--format", "json", "--file", &out,
        "--sprint", "2026-02-06",
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let alerts: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let alerts = alerts.as_array().expect("array");

    assert_eq!(alerts.len(), 3);
    let dismissed: Vec<&str> = alerts
        .iter()
        .filter(|a| a["dismissed"] == true)
        .filter_map(|a| a["alert_id"].as_str())
        .collect();
    assert_eq!(dismissed, vec!["rem-gt-sp:FEB-2"]);
}

#[test]
fn test_export_xlsx_creates_file() {
    let db_path = setup_test_db("export_history_xlsx");
    init_db_with_data(&db_path, "export_history_xlsx");

    let out = temp_out("export_history_xlsx", "xlsx");
    sp().args([
        "--db", &db_path, "export", "--format", "xlsx", "--file", &out,
    ])
    .assert()
    .success();

    let meta = fs::metadata(&out).expect("xlsx written");
    assert!(meta.len() > 0);
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = setup_test_db("export_relative");
    init_db_with_data(&db_path, "export_relative");

    sp().args([
        "--db", &db_path, "export", "--format", "csv", "--file", "relative.csv",
    ])
    .assert()
    .failure()
    .stderr(contains("must be absolute"));
}

#[test]
fn test_export_force_overwrites() {
    let db_path = setup_test_db("export_force");
    init_db_with_data(&db_path, "export_force");

    let out = temp_out("export_force", "csv");
    fs::write(&out, "stale").unwrap();

    sp().args([
        "--db", &db_path, "export", "--format", "csv", "--file", &out, "--force",
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("sprint_key,"));
}

#[test]
fn test_export_alerts_appends_to_audit_trail() {
    let db_path = setup_test_db("export_alerts_audit");
    init_db_with_data(&db_path, "export_alerts_audit");

    let audited = || {
        let pool = DbPool::open(&db_path).expect("open db");
        load_audit(&pool.conn, date::today())
            .expect("load audit")
            .into_iter()
            .filter(|e| e.sprint_key == "2026-02-06")
            .count()
    };
    assert_eq!(audited(), 0);

    let out = temp_out("export_alerts_audit", "csv");
    for _ in 0..2 {
        sp().args([
            "--db", &db_path, "export", "--what", "alerts", "--format", "csv", "--file", &out,
            "--sprint", "2026-02-06", "--force",
        ])
        .assert()
        .success();
    }

    // each export is one evaluation run: three raw alerts, never deduplicated
    assert_eq!(audited(), 6);
}
