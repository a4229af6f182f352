mod common;
use chrono::NaiveDate;
use common::{open_test_db, row};
use sprintpulse::config::Config;
use sprintpulse::core::alerts::AlertLogic;
use sprintpulse::core::history::{HistoryAccumulator, UpsertOutcome, ideal_burndown};
use sprintpulse::core::ingest::{IngestLogic, IngestRequest};
use sprintpulse::core::sprint::{SprintWindowResolver, WindowResolution};
use sprintpulse::db::alerts::load_audit;
use sprintpulse::db::queries::{load_tickets, load_windows};
use sprintpulse::errors::AppError;
use sprintpulse::models::snapshot::HistorySnapshot;
use sprintpulse::models::ticket::RawTicketRow;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn snapshot(key: &str, date: NaiveDate, remaining: f64) -> HistorySnapshot {
    HistorySnapshot {
        sprint_key: key.to_string(),
        snapshot_date: date,
        total_remaining_days: remaining,
        remaining_task_count: 1,
        completed_task_count: 0,
    }
}

fn ticket(key: &str, status: &str, sp: &str, assignee: &str) -> RawTicketRow {
    row(&[
        ("Issue key", key),
        ("Status", status),
        ("Custom field (Story Points)", sp),
        ("Assignee", assignee),
        ("Sprint", "Sprint.2026.Feb.06"),
    ])
}

#[test]
fn test_same_day_upload_overwrites() {
    let pool = open_test_db("history_overwrite");
    let history = HistoryAccumulator::new(&pool.conn);
    let day = d(2026, 1, 27);

    let first = history.record(&snapshot("2026-02-06", day, 40.0)).unwrap();
    let second = history.record(&snapshot("2026-02-06", day, 35.0)).unwrap();

    assert_eq!(first, UpsertOutcome::Inserted);
    assert_eq!(second, UpsertOutcome::Replaced);

    let series = history.series("2026-02-06").unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].total_remaining_days, 35.0);
}

#[test]
fn test_delete_single_entry() {
    let pool = open_test_db("history_delete");
    let history = HistoryAccumulator::new(&pool.conn);
    history.record(&snapshot("2026-02-06", d(2026, 1, 26), 10.0)).unwrap();
    history.record(&snapshot("2026-02-06", d(2026, 1, 27), 8.0)).unwrap();

    history.delete("2026-02-06", d(2026, 1, 26)).unwrap();
    let series = history.series("2026-02-06").unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].snapshot_date, d(2026, 1, 27));

    let err = history.delete("2026-02-06", d(2026, 1, 26)).unwrap_err();
    assert!(matches!(err, AppError::NoHistoryEntry(_, _)));
}

#[test]
fn test_ideal_line_baseline() {
    let window = SprintWindowResolver::default().window_ending(d(2026, 2, 6)).unwrap();

    let series = vec![
        snapshot("2026-02-06", d(2026, 1, 20), 30.0),
        snapshot("2026-02-06", d(2026, 1, 23), 28.0),
        snapshot("2026-02-06", d(2026, 1, 28), 20.0),
    ];
    let ideal = ideal_burndown(&window, &series).unwrap();
    assert_eq!(ideal.start_date, d(2026, 1, 24));
    assert_eq!(ideal.start_value, 28.0);
    assert_eq!(ideal.value_at(d(2026, 2, 6)), 0.0);
    assert_eq!(ideal.value_at(d(2026, 1, 24)), 28.0);
    assert_eq!(ideal.value_at(d(2026, 1, 31)), 28.0 * 6.0 / 13.0);

    // nothing before the start: the earliest snapshot is the baseline
    let late = vec![
        snapshot("2026-02-06", d(2026, 1, 29), 12.0),
        snapshot("2026-02-06", d(2026, 1, 27), 15.0),
    ];
    assert_eq!(ideal_burndown(&window, &late).unwrap().start_value, 15.0);

    assert!(ideal_burndown(&window, &[]).is_none());
}

#[test]
fn test_ingest_twice_keeps_one_snapshot() {
    let pool = open_test_db("ingest_idempotent");
    let resolver = SprintWindowResolver::default();
    let today = d(2026, 1, 27);

    let rows = vec![
        ticket("P-1", "To Do", "25", "Anna Rossi"),
        ticket("P-2", "To Do", "15", "Marco Bianchi"),
    ];
    let req = IngestRequest {
        rows,
        ..Default::default()
    };
    let report = IngestLogic::apply(&pool.conn, &resolver, req, today).unwrap();
    assert_eq!(report.outcome, Some(UpsertOutcome::Inserted));
    assert_eq!(report.snapshot.as_ref().unwrap().total_remaining_days, 40.0);

    let rows = vec![
        ticket("P-1", "To Do", "20", "Anna Rossi"),
        ticket("P-2", "To Do", "15", "Marco Bianchi"),
    ];
    let req = IngestRequest {
        rows,
        ..Default::default()
    };
    let report = IngestLogic::apply(&pool.conn, &resolver, req, today).unwrap();
    assert_eq!(report.outcome, Some(UpsertOutcome::Replaced));

    let series = HistoryAccumulator::new(&pool.conn).series("2026-02-06").unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].total_remaining_days, 35.0);
    assert_eq!(series[0].snapshot_date, today);
}

#[test]
fn test_excluded_assignee_never_reaches_totals_or_alerts() {
    let pool = open_test_db("ingest_exclusion");
    let resolver = SprintWindowResolver::default();

    let req = IngestRequest {
        rows: vec![
            ticket("E-1", "To Do", "4", "Anna Rossi"),
            row(&[
                ("Issue key", "E-2"),
                ("Status", "In Progress"),
                ("Custom field (Story Points)", "1"),
                ("Remaining Estimate", "288000"),
                ("Priority", "Blocker"),
                ("Assignee", "Zoe Verdi"),
                ("Sprint", "Sprint.2026.Feb.06"),
            ]),
        ],
        excluded_assignee: "zoe".to_string(),
        ..Default::default()
    };
    let report = IngestLogic::apply(&pool.conn, &resolver, req, d(2026, 1, 27)).unwrap();

    assert_eq!(report.stats.excluded, 1);
    assert_eq!(report.snapshot.as_ref().unwrap().total_remaining_days, 4.0);

    let stored = load_tickets(&pool.conn, "2026-02-06").unwrap();
    assert_eq!(stored.len(), 1);

    let window = report.window().unwrap().clone();
    let now = d(2026, 1, 27).and_hms_opt(10, 0, 0).unwrap();
    let alerts = AlertLogic::evaluate(&pool.conn, &Config::default(), &window, now).unwrap();
    assert!(alerts.evaluation.raw.iter().all(|a| a.ticket_key != "E-2"));
}

#[test]
fn test_ambiguous_batch_writes_nothing() {
    let pool = open_test_db("ingest_ambiguous");
    let resolver = SprintWindowResolver::default();

    let req = IngestRequest {
        rows: vec![
            ticket("A-1", "To Do", "1", "Anna Rossi"),
            row(&[
                ("Issue key", "A-2"),
                ("Status", "To Do"),
                ("Sprint", "Sprint.2026.Feb.20"),
            ]),
        ],
        ..Default::default()
    };
    let report = IngestLogic::apply(&pool.conn, &resolver, req, d(2026, 1, 27)).unwrap();

    assert!(matches!(report.resolution, WindowResolution::Ambiguous(_)));
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.discovered.len(), 2);
    assert!(report.snapshot.is_none());
    assert!(load_windows(&pool.conn).unwrap().is_empty());
}

#[test]
fn test_every_evaluation_is_audited() {
    let pool = open_test_db("audit_append");
    let resolver = SprintWindowResolver::default();
    let req = IngestRequest {
        rows: vec![row(&[
            ("Issue key", "R-1"),
            ("Status", "To Do"),
            ("Priority", "Critical"),
            ("Sprint", "Sprint.2026.Feb.06"),
        ])],
        ..Default::default()
    };
    let report = IngestLogic::apply(&pool.conn, &resolver, req, d(2026, 1, 27)).unwrap();
    let window = report.window().unwrap().clone();
    let cfg = Config::default();
    let now = d(2026, 1, 27).and_hms_opt(10, 0, 0).unwrap();

    AlertLogic::evaluate(&pool.conn, &cfg, &window, now).unwrap();
    AlertLogic::dismiss(&pool.conn, "risk-priority:R-1", "marco", "").unwrap();
    let second = AlertLogic::evaluate(&pool.conn, &cfg, &window, now).unwrap();

    assert!(second.evaluation.visible.is_empty());
    // dismissed alerts are still audited, and nothing is deduplicated
    let audit = load_audit(&pool.conn, d(2026, 1, 27)).unwrap();
    assert_eq!(audit.len(), 2);
    assert!(audit.iter().all(|e| e.alert_id == "risk-priority:R-1"));

    let err = AlertLogic::dismiss(&pool.conn, "bogus", "marco", "").unwrap_err();
    assert!(matches!(err, AppError::UnknownAlert(_)));
}
