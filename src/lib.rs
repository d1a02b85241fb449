// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod notify;
pub mod service;
pub mod session;
pub mod store;
pub mod task;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ProjectFile;
use crate::config::loader::load_and_validate;
use crate::dag::{ScheduleSnapshot, compute_schedule};
use crate::engine::spawn_engine;
use crate::notify::ScheduleEvent;
use crate::service::TaskService;
use crate::session::run_session;
use crate::store::{MemoryTaskStore, TaskStore};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project file loading
/// - one-shot schedule output (table or JSON)
/// - for `--follow`: store, engine runtime, task service and the stdin
///   session, plus Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let project = load_and_validate(&args.config)?;

    if args.dry_run {
        print_dry_run(&project);
        return Ok(());
    }

    if !args.follow {
        let snapshot = compute_schedule(project.tasks());
        if args.json {
            println!("{}", ScheduleEvent::ScheduleUpdated(snapshot).to_json()?);
        } else {
            print_schedule(&project, &snapshot);
        }
        return Ok(());
    }

    let options = project.config.engine_options();
    let store: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::with_tasks(project.into_tasks()));
    let (engine, engine_task) = spawn_engine(Arc::clone(&store), options);
    let service = TaskService::new(store, engine.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = run_session(&service, stdin, tokio::io::stdout()) => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                eprintln!("failed to listen for Ctrl+C: {e}");
            }
            info!("Ctrl-C received; stopping session");
        }
    }

    engine.shutdown().await?;
    engine_task.await??;
    Ok(())
}

/// Simple dry-run output: print tasks and their dependency references.
fn print_dry_run(project: &ProjectFile) {
    println!("cpmflow dry-run");
    println!("  config.observer_buffer = {}", project.config.observer_buffer);
    println!("  config.engine_queue = {}", project.config.engine_queue);
    println!(
        "  config.strict_dependencies = {}",
        project.config.strict_dependencies
    );
    println!();

    println!("tasks ({}):", project.tasks().len());
    for task in project.tasks() {
        println!("  - [{}] {}", task.id, task.title);
        println!("      status: {}", task.status);
        println!("      dates: {} .. {}", task.start_date, task.end_date);
        if !task.dependencies.is_empty() {
            println!("      dependencies: {}", task.dependencies);
        }
        if let Some(assignee) = task.assignee {
            println!("      assignee: {assignee}");
        }
    }

    debug!("dry-run complete (no schedule computed)");
}

fn print_schedule(project: &ProjectFile, snapshot: &ScheduleSnapshot) {
    if let Some(ref unresolved) = snapshot.cycle {
        println!("no valid schedule: dependency cycle among tasks {unresolved:?}");
        return;
    }

    println!("project duration: {} day(s)", snapshot.project_duration);
    println!("critical path: {:?}", snapshot.critical_task_ids);
    println!();
    println!(
        "{:>5}  {:<24} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5}  {}",
        "id", "title", "dur", "ES", "EF", "LS", "LF", "float", "crit"
    );

    for entry in &snapshot.entries {
        let title = project
            .tasks()
            .iter()
            .find(|t| t.id == entry.id)
            .map(|t| t.title.as_str())
            .unwrap_or("");
        println!(
            "{:>5}  {:<24} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5}  {}",
            entry.id,
            title,
            entry.duration,
            entry.earliest_start,
            entry.earliest_finish,
            entry.latest_start,
            entry.latest_finish,
            entry.float,
            if entry.critical { "*" } else { "" }
        );
    }
}
