mod common;
use common::row;
use sprintpulse::core::normalizer::{FieldNormalizer, NormalizeStats, first_name};
use sprintpulse::import::read_csv_from;
use sprintpulse::models::ticket::{Priority, TicketStatus};

fn normalize(pairs: &[(&str, &str)]) -> sprintpulse::models::ticket::NormalizedRecord {
    let mut stats = NormalizeStats::default();
    FieldNormalizer::new("")
        .normalize_row(&row(pairs), &mut stats)
        .expect("row has a key")
}

#[test]
fn test_todo_ignores_raw_estimates() {
    let r = normalize(&[
        ("Issue key", "X-1"),
        ("Status", "To Do"),
        ("Custom field (Story Points)", "3"),
        ("Remaining Estimate", "86400"),
        ("Time Spent", "28800"),
        ("Priority", "Blocker"),
    ]);

    assert_eq!(r.status, TicketStatus::ToDo);
    assert_eq!(r.remaining_days, 3.0);
    assert_eq!(r.spent_days, 0.0);
    assert_eq!(r.priority, Priority::Blocker);
}

#[test]
fn test_done_like_spends_the_whole_estimate() {
    for status in ["Done", "Resolved", "Closed", "Cancelled"] {
        let r = normalize(&[
            ("Issue key", "X-2"),
            ("Status", status),
            ("Custom field (Story Points)", "4"),
            ("Remaining Estimate", "28800"),
            ("Time Spent", "0"),
        ]);
        assert_eq!(r.remaining_days, 0.0, "{status}");
        assert_eq!(r.spent_days, 4.0, "{status}");
    }
}

#[test]
fn test_in_progress_converts_seconds_to_days() {
    let r = normalize(&[
        ("Issue key", "X-3"),
        ("Status", "In Progress"),
        ("Custom field (Story Points)", "5"),
        ("Remaining Estimate", "172800"),
        ("Time Spent", "14400"),
    ]);

    assert_eq!(r.remaining_days, 6.0);
    assert_eq!(r.spent_days, 0.5);
}

#[test]
fn test_missing_remaining_is_derived_from_spent() {
    let r = normalize(&[
        ("Issue key", "X-4"),
        ("Status", "In Progress"),
        ("Custom field (Story Points)", "5"),
        ("Time Spent", "57600"),
    ]);
    assert_eq!(r.spent_days, 2.0);
    assert_eq!(r.remaining_days, 3.0);

    // spent above the estimate never yields a negative remainder
    let r = normalize(&[
        ("Issue key", "X-5"),
        ("Status", "In Progress"),
        ("Custom field (Story Points)", "1"),
        ("Time Spent", "57600"),
    ]);
    assert_eq!(r.remaining_days, 0.0);
}

#[test]
fn test_adversarial_numbers_are_never_negative() {
    let mut stats = NormalizeStats::default();
    let r = FieldNormalizer::new("")
        .normalize_row(
            &row(&[
                ("Issue key", "X-6"),
                ("Status", "In Progress"),
                ("Custom field (Story Points)", "-3"),
                ("Remaining Estimate", "-28800"),
                ("Time Spent", "abc"),
            ]),
            &mut stats,
        )
        .expect("row has a key");

    assert_eq!(r.story_points_days, 0.0);
    assert_eq!(r.remaining_days, 0.0);
    assert_eq!(r.spent_days, 0.0);
    assert_eq!(stats.defaulted_fields, 1);
}

#[test]
fn test_unknown_status_is_counted_and_kept() {
    let mut stats = NormalizeStats::default();
    let r = FieldNormalizer::new("")
        .normalize_row(
            &row(&[
                ("Issue key", "X-7"),
                ("Status", "Waiting for Godot"),
                ("Custom field (Story Points)", "2"),
            ]),
            &mut stats,
        )
        .expect("row has a key");

    assert_eq!(r.status, TicketStatus::Other);
    assert_eq!(r.raw_status, "Waiting for Godot");
    assert_eq!(r.remaining_days, 2.0);
    assert_eq!(stats.unknown_status, 1);
}

#[test]
fn test_story_points_column_found_by_fragment() {
    let r = normalize(&[
        ("Issue key", "X-8"),
        ("Status", "To Do"),
        ("Story Points Estimate", "8"),
    ]);
    assert_eq!(r.story_points_days, 8.0);
}

#[test]
fn test_sprint_key_is_latest_label_of_the_row() {
    let r = normalize(&[
        ("Issue key", "X-9"),
        ("Status", "To Do"),
        ("Sprint", "Sprint.2026.Jan.23"),
        ("Sprint", "Sprint.2026.Feb.06"),
    ]);
    assert_eq!(r.sprint_key.as_deref(), Some("2026-02-06"));
}

#[test]
fn test_first_name_token() {
    assert_eq!(first_name("  Anna   Rossi "), "Anna");
    assert_eq!(first_name(""), "");
}

#[test]
fn test_batch_drops_keyless_excluded_and_duplicate_rows() {
    let csv = "Issue key,Status,Assignee,Custom field (Story Points)\n\
               A-1,To Do,Anna Rossi,1\n\
               ,To Do,Anna Rossi,1\n\
               A-2,To Do,zoe Verdi,2\n\
               A-3,To Do,Marco Bianchi,3\n\
               A-1,Done,Anna Rossi,5\n";
    let rows = read_csv_from(csv.as_bytes()).expect("parse csv");
    let batch = FieldNormalizer::new("Zoe").normalize_batch(&rows);

    let keys: Vec<&str> = batch.records.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["A-1", "A-3"]);
    assert_eq!(batch.records[0].status, TicketStatus::DoneLike);
    assert_eq!(batch.records[0].story_points_days, 5.0);

    assert_eq!(batch.stats.rows_seen, 5);
    assert_eq!(batch.stats.missing_key, 1);
    assert_eq!(batch.stats.excluded, 1);
    assert_eq!(batch.stats.duplicate_keys, 1);
    assert_eq!(batch.stats.accepted, 2);
}

#[test]
fn test_csv_reader_keeps_repeated_headers_and_strips_bom() {
    let csv = "\u{feff}Issue key,Sprint,Sprint\nA-1,Sprint.2026.Jan.23,Sprint.2026.Feb.06\n\n";
    let rows = read_csv_from(csv.as_bytes()).expect("parse csv");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Issue key"), Some("A-1"));
    assert_eq!(rows[0].values_containing("Sprint").len(), 2);
}

#[test]
fn test_csv_reader_survives_latin1_bytes_in_one_row() {
    let mut csv: Vec<u8> = b"Issue key,Status,Assignee\nX-1,To Do,Anna Rossi\nX-2,To Do,Ren".to_vec();
    csv.push(0xe9);
    csv.extend_from_slice(b" Dupont\nX-3,Done,Marco Bianchi\n");

    let rows = read_csv_from(csv.as_slice()).expect("import must not fail on one bad row");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].get("Issue key"), Some("X-2"));
    assert_eq!(rows[1].get("Assignee"), Some("Ren\u{fffd} Dupont"));
    assert_eq!(rows[2].get("Issue key"), Some("X-3"));

    let batch = FieldNormalizer::new("").normalize_batch(&rows);
    assert_eq!(batch.stats.accepted, 3);
    assert_eq!(batch.records[1].assignee_first_name, "Ren\u{fffd}");
}
