use sprintpulse::config::Config;
use sprintpulse::errors::AppError;

#[test]
fn test_missing_fields_take_defaults() {
    let cfg = Config::from_yaml("database: /tmp/sp.sqlite\n").expect("valid config");

    assert_eq!(cfg.database, "/tmp/sp.sqlite");
    assert_eq!(cfg.excluded_assignee, "");
    assert_eq!(cfg.sprint_length_days, 14);
    assert_eq!(cfg.estimate_tolerance_days, 0.0);
    assert_eq!(cfg.workload_limit_days, 10.0);
    assert!(cfg.low_capacity_assignees.is_empty());
}

#[test]
fn test_full_config_round_trips_through_yaml() {
    let yaml = "database: /tmp/sp.sqlite\n\
                excluded_assignee: Zoe\n\
                sprint_length_days: 10\n\
                estimate_tolerance_days: 0.5\n\
                workload_limit_days: 8.0\n\
                low_capacity_assignees:\n  - Sara\n";
    let cfg = Config::from_yaml(yaml).expect("valid config");
    assert_eq!(cfg.sprint_length_days, 10);
    assert_eq!(cfg.low_capacity_assignees, vec!["Sara".to_string()]);

    let again = Config::from_yaml(&serde_yaml::to_string(&cfg).unwrap()).unwrap();
    assert_eq!(again.excluded_assignee, "Zoe");
    assert_eq!(again.estimate_tolerance_days, 0.5);
}

#[test]
fn test_invalid_sprint_length_is_rejected() {
    let err = Config::from_yaml("database: x\nsprint_length_days: 0\n").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));

    let err = Config::from_yaml("database: x\nsprint_length_days: 1000000000000\n").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));

    let err = Config::from_yaml("database: [").unwrap_err();
    assert!(matches!(err, AppError::ConfigParse(_)));
}
