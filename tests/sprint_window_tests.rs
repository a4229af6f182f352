mod common;
use chrono::NaiveDate;
use common::{open_test_db, row};
use sprintpulse::core::normalizer::FieldNormalizer;
use sprintpulse::core::selection::{resolve_window, select_window};
use sprintpulse::core::sprint::{
    SprintWindowResolver, WindowResolution, current_window, default_window, parse_sprint_label,
    working_days_left,
};
use sprintpulse::db::queries::upsert_window;
use sprintpulse::errors::AppError;
use sprintpulse::models::sprint::SprintWindow;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_parse_sprint_label_variants() {
    assert_eq!(parse_sprint_label("Sprint.2026.Feb.06"), Some(d(2026, 2, 6)));
    assert_eq!(parse_sprint_label("SPRINT 2026-02-06"), Some(d(2026, 2, 6)));
    assert_eq!(parse_sprint_label("Team A Sprint_2026_february_6"), Some(d(2026, 2, 6)));
    assert_eq!(parse_sprint_label("Sprint.2026.Feb.30"), None);
    assert_eq!(parse_sprint_label("Backlog"), None);
}

#[test]
fn test_window_spans_sprint_length() {
    let resolver = SprintWindowResolver::default();
    let w = resolver.window_from_label("Sprint.2026.Feb.06").expect("label");

    assert_eq!(w.key(), "2026-02-06");
    assert_eq!(w.start_date, d(2026, 1, 24));
    assert_eq!(w.end_date, d(2026, 2, 6));
    assert!(w.contains(d(2026, 1, 24)) && w.contains(d(2026, 2, 6)));
    assert!(!w.contains(d(2026, 2, 7)));

    let short = SprintWindowResolver::new(7).window_ending(d(2026, 2, 6)).unwrap();
    assert_eq!(short.start_date, d(2026, 1, 31));
}

#[test]
fn test_oversized_sprint_length_never_panics() {
    let resolver = SprintWindowResolver::new(1_000_000_000_000);
    let w = resolver.window_ending(d(2026, 2, 6)).unwrap();
    assert_eq!(w.start_date, d(2025, 2, 6));

    let err = SprintWindowResolver::new(366)
        .window_ending(NaiveDate::MIN)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidWindow(_)));
}

#[test]
fn test_override_rejects_start_after_end() {
    let resolver = SprintWindowResolver::default();
    let err = resolver
        .override_window(d(2026, 2, 10), d(2026, 2, 6))
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidWindow(_)));

    let single_day = resolver.override_window(d(2026, 2, 6), d(2026, 2, 6));
    assert!(single_day.is_ok());
}

#[test]
fn test_resolve_batch_inferred_ambiguous_unknown_override() {
    let resolver = SprintWindowResolver::default();
    let normalizer = FieldNormalizer::new("");

    let feb = row(&[("Issue key", "A-1"), ("Status", "To Do"), ("Sprint", "Sprint.2026.Feb.06")]);
    let mar = row(&[("Issue key", "A-2"), ("Status", "To Do"), ("Sprint", "Sprint.2026.Mar.06")]);
    let none = row(&[("Issue key", "A-3"), ("Status", "To Do")]);

    let batch = normalizer.normalize_batch(&[feb.clone(), none.clone()]);
    match resolver.resolve_batch(&batch.records, None) {
        WindowResolution::Inferred(w) => assert_eq!(w.key(), "2026-02-06"),
        other => panic!("expected inferred window, got {:?}", other),
    }

    let batch = normalizer.normalize_batch(&[feb, mar, none.clone()]);
    match resolver.resolve_batch(&batch.records, None) {
        WindowResolution::Ambiguous(found) => {
            let keys: Vec<String> = found.iter().map(|w| w.key()).collect();
            assert_eq!(keys, vec!["2026-02-06", "2026-03-06"]);
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }

    // an override wins even over disagreeing labels
    let forced = resolver.window_ending(d(2026, 3, 6)).unwrap();
    let res = resolver.resolve_batch(&batch.records, Some(forced.clone()));
    assert_eq!(res, WindowResolution::Override(forced));

    let batch = normalizer.normalize_batch(&[none]);
    assert_eq!(resolver.resolve_batch(&batch.records, None), WindowResolution::Unknown);
}

#[test]
fn test_current_window_prefers_earliest_end_then_start() {
    let a = SprintWindow::new("A", d(2026, 1, 10), d(2026, 1, 23)).unwrap();
    let b = SprintWindow::new("B", d(2026, 1, 24), d(2026, 2, 6)).unwrap();
    let c = SprintWindow::new("C", d(2026, 1, 20), d(2026, 2, 6)).unwrap();
    let windows = vec![a.clone(), b, c.clone()];

    assert_eq!(current_window(&windows, d(2026, 1, 23)), Some(&a));
    assert_eq!(current_window(&windows, d(2026, 1, 24)), Some(&c));
    assert_eq!(current_window(&windows, d(2026, 2, 7)), None);

    // once every window is over, the latest one is the default
    assert_eq!(default_window(&windows, d(2026, 3, 1)).map(|w| w.label.as_str()), Some("B"));
}

#[test]
fn test_selection_persists_and_explicit_key_wins() {
    let pool = open_test_db("selection_persists");
    let resolver = SprintWindowResolver::default();
    let jan = resolver.window_ending(d(2026, 1, 23)).unwrap();
    let feb = resolver.window_ending(d(2026, 2, 6)).unwrap();
    upsert_window(&pool.conn, &jan).unwrap();
    upsert_window(&pool.conn, &feb).unwrap();

    let today = d(2026, 1, 15);
    assert_eq!(resolve_window(&pool.conn, None, today).unwrap(), jan);

    select_window(&pool.conn, "2026-02-06").unwrap();
    assert_eq!(resolve_window(&pool.conn, None, today).unwrap(), feb);
    assert_eq!(resolve_window(&pool.conn, Some("2026-01-23"), today).unwrap(), jan);

    let err = resolve_window(&pool.conn, Some("2025-12-31"), today).unwrap_err();
    assert!(matches!(err, AppError::UnknownSprint(_)));
    assert!(matches!(
        select_window(&pool.conn, "2025-12-31").unwrap_err(),
        AppError::UnknownSprint(_)
    ));
}

#[test]
fn test_no_window_is_an_error() {
    let pool = open_test_db("no_window");
    let err = resolve_window(&pool.conn, None, d(2026, 1, 1)).unwrap_err();
    assert!(matches!(err, AppError::NoSprintWindow));
}

#[test]
fn test_working_days_left_skips_weekends() {
    // 2026-01-26 is a Monday, 2026-02-06 a Friday
    assert_eq!(working_days_left(d(2026, 1, 26), d(2026, 2, 6)), 10);
    assert_eq!(working_days_left(d(2026, 1, 31), d(2026, 2, 1)), 0);
    assert_eq!(working_days_left(d(2026, 2, 6), d(2026, 2, 6)), 1);
    assert_eq!(working_days_left(d(2026, 2, 7), d(2026, 2, 6)), 0);
}
