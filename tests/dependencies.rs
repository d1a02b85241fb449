// tests/dependencies.rs

use cpmflow::task::Task;
use cpmflow::types::{Dependencies, TaskStatus};

#[test]
fn delimited_and_list_encodings_normalize_to_same_set() {
    let from_text = Dependencies::parse(" 2, x,1,,2 ");
    let from_list = Dependencies::from(vec![2, 1]);

    assert_eq!(from_text, from_list);
    assert_eq!(from_text.ids(), &[1, 2]);
}

#[test]
fn equality_ignores_declaration_order() {
    assert_eq!(Dependencies::parse("1,2"), Dependencies::from(vec![2, 1]));
    assert_eq!(Dependencies::parse("3,1,2,1"), Dependencies::parse("1,2,3"));
    assert_ne!(Dependencies::parse("1,2"), Dependencies::parse("1,2,3"));

    let deps = Dependencies::from(vec![9, 4, 4]);
    assert_eq!(deps.len(), 2);
    assert!(deps.contains(4) && deps.contains(9));
    assert!(!deps.contains(5));
}

#[test]
fn format_then_parse_round_trips() {
    let deps = Dependencies::from(vec![3, 10, 7]);
    assert_eq!(deps.to_delimited(), "3,7,10");
    assert_eq!(Dependencies::parse(&deps.to_delimited()), deps);

    assert_eq!(Dependencies::new().to_delimited(), "");
    assert!(Dependencies::parse("").is_empty());
    assert!(Dependencies::parse(" , ,abc").is_empty());
}

#[test]
fn negative_and_fractional_tokens_are_ignored() {
    let deps = Dependencies::parse("-1,2.5,4");
    assert_eq!(deps.ids(), &[4]);
}

#[test]
fn task_json_accepts_string_or_list_dependencies() {
    let with_string: Task = serde_json::from_str(
        r#"{"id":5,"title":"t","status":"in-progress","start_date":"2024-01-01",
            "end_date":"2024-01-02","dependencies":"1,2","assigned_employee":9}"#,
    )
    .unwrap();
    let with_list: Task = serde_json::from_str(
        r#"{"id":5,"title":"t","status":"in-progress","start_date":"2024-01-01",
            "end_date":"2024-01-02","dependencies":[1,"2"],"assignee":9}"#,
    )
    .unwrap();

    assert_eq!(with_string, with_list);
    assert_eq!(with_string.status, TaskStatus::InProgress);
    assert_eq!(with_string.assignee, Some(9));
}

#[test]
fn task_json_tolerates_missing_or_null_dependencies() {
    let missing: Task = serde_json::from_str(
        r#"{"id":1,"title":"t","status":"todo","start_date":"2024-01-01","end_date":"2024-01-01"}"#,
    )
    .unwrap();
    let null: Task = serde_json::from_str(
        r#"{"id":1,"title":"t","status":"todo","start_date":"2024-01-01",
            "end_date":"2024-01-01","dependencies":null}"#,
    )
    .unwrap();

    assert!(missing.dependencies.is_empty());
    assert!(null.dependencies.is_empty());
}

#[test]
fn dependencies_serialize_as_list() {
    let deps = Dependencies::parse("4,2");
    assert_eq!(serde_json::to_string(&deps).unwrap(), "[2,4]");
}

#[test]
fn status_parses_and_displays_kebab_case() {
    assert_eq!("In-Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
    assert_eq!(TaskStatus::InProgress.to_string(), "in-progress");
    assert!("blocked".parse::<TaskStatus>().is_err());
}
