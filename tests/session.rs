// tests/session.rs

mod common;
use crate::common::builders::{TaskBuilder, diamond};
use crate::common::{init_tracing, with_timeout};

use std::sync::Arc;

use serde_json::Value;

use cpmflow::engine::{EngineOptions, spawn_engine};
use cpmflow::service::TaskService;
use cpmflow::session::{SessionCommand, parse_command, run_session};
use cpmflow::store::{MemoryTaskStore, TaskStore};

fn service_with(tasks: Vec<cpmflow::task::Task>) -> TaskService {
    let store: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::with_tasks(tasks));
    let (engine, _join) = spawn_engine(Arc::clone(&store), EngineOptions::default());
    TaskService::new(store, engine)
}

async fn run_lines(service: &TaskService, input: &str) -> Vec<Value> {
    let output = with_timeout(run_session(service, input.as_bytes(), Vec::new()))
        .await
        .unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn kinds(lines: &[Value]) -> Vec<&str> {
    lines.iter().map(|v| v["kind"].as_str().unwrap()).collect()
}

#[test]
fn parse_command_skips_blank_and_comment_lines() {
    assert_eq!(parse_command("").unwrap(), None);
    assert_eq!(parse_command("   ").unwrap(), None);
    assert_eq!(parse_command("# note").unwrap(), None);
    assert_eq!(
        parse_command(r#"{"op":"delete","id":3}"#).unwrap(),
        Some(SessionCommand::Delete { id: 3 })
    );
    assert_eq!(
        parse_command(r#"{"op":"list"}"#).unwrap(),
        Some(SessionCommand::List { assignee: None })
    );
    assert!(parse_command(r#"{"op":"explode"}"#).is_err());
    assert!(parse_command("not json").is_err());
}

#[test]
fn parse_create_accepts_string_dependencies() {
    let command = parse_command(
        r#"{"op":"create","task":{"title":"E","start_date":"2024-01-09","end_date":"2024-01-12","dependencies":"4, 2"}}"#,
    )
    .unwrap()
    .unwrap();

    match command {
        SessionCommand::Create { task } => {
            assert_eq!(task.dependencies.ids(), &[2, 4]);
            assert_eq!(task.assignee, None);
        }
        other => panic!("expected create, got {other:?}"),
    }
}

#[tokio::test]
async fn session_streams_events_in_command_order() {
    init_tracing();
    let service = service_with(diamond());

    let input = r#"
# add a release step after D
{"op":"create","task":{"title":"E","start_date":"2024-01-09","end_date":"2024-01-12","dependencies":"4"}}
{"op":"update","id":5,"task":{"title":"E","status":"done","start_date":"2024-01-09","end_date":"2024-01-12","dependencies":[4]}}
not json
{"op":"delete","id":42}
{"op":"list"}
{"op":"refresh"}
{"op":"delete","id":5}
"#;
    let lines = run_lines(&service, input).await;

    assert_eq!(
        kinds(&lines),
        vec![
            "initial_tasks",
            "schedule_updated",
            "task_created",
            "schedule_updated",
            "task_updated",
            "task_moved",
            "schedule_updated",
            "command_failed",
            "command_failed",
            "task_list",
            "schedule_updated",
            "task_deleted",
            "schedule_updated",
        ]
    );

    assert_eq!(lines[1]["projectDuration"], 8);
    assert_eq!(lines[2]["task"]["id"], 5);
    assert_eq!(lines[3]["projectDuration"], 11);
    assert_eq!(lines[3]["criticalTaskIds"], serde_json::json!([1, 3, 4, 5]));
    assert_eq!(lines[5]["status"], "done");
    assert_eq!(lines[7]["op"], "parse");
    assert_eq!(lines[8]["op"], "delete");
    assert!(lines[8]["error"].as_str().unwrap().contains("42"));
    assert_eq!(lines[9]["tasks"].as_array().unwrap().len(), 5);
    assert_eq!(lines[11]["id"], 5);
    assert_eq!(lines[12]["projectDuration"], 8);
}

#[tokio::test]
async fn list_filters_by_assignee() {
    init_tracing();
    let service = service_with(vec![
        TaskBuilder::new(1).assignee(7).build(),
        TaskBuilder::new(2).build(),
    ]);

    let lines = run_lines(&service, "{\"op\":\"list\",\"assignee\":7}\n").await;

    assert_eq!(kinds(&lines), vec!["initial_tasks", "schedule_updated", "task_list"]);
    let listed = lines[2]["tasks"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], 1);
    assert_eq!(listed[0]["assignee"], 7);
}

#[tokio::test]
async fn invalid_draft_is_reported_not_fatal() {
    init_tracing();
    let service = service_with(Vec::new());

    let input = concat!(
        r#"{"op":"create","task":{"title":"","start_date":"2024-01-01","end_date":"2024-01-02"}}"#,
        "\n",
        r#"{"op":"create","task":{"title":"A","start_date":"2024-01-01","end_date":"2024-01-02"}}"#,
        "\n",
    );
    let lines = run_lines(&service, input).await;

    assert_eq!(
        kinds(&lines),
        vec![
            "initial_tasks",
            "schedule_updated",
            "command_failed",
            "task_created",
            "schedule_updated",
        ]
    );
    assert_eq!(lines[2]["op"], "create");
    assert_eq!(lines[3]["task"]["id"], 1);
}

#[tokio::test]
async fn session_unsubscribes_at_eof() {
    init_tracing();
    let service = service_with(diamond());

    run_lines(&service, "").await;
    let mut watcher = service.subscribe().await.unwrap();
    // Initial events only: the finished session is no longer registered, but
    // the new watcher is.
    assert_eq!(with_timeout(watcher.recv()).await.unwrap().kind(), "initial_tasks");
    assert_eq!(watcher.id(), 2);
}
