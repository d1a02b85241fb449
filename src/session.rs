// src/session.rs

//! Interactive JSON-lines session (`cpmflow --follow`).
//!
//! Input: one command per line, e.g.
//!
//! ```text
//! {"op":"create","task":{"title":"Build","start_date":"2024-01-03","end_date":"2024-01-08","dependencies":"1"}}
//! {"op":"update","id":2,"task":{...}}
//! {"op":"delete","id":2}
//! {"op":"refresh"}
//! {"op":"list","assignee":7}
//! ```
//!
//! Output: every observer event as a JSON line, plus `task_list` replies and
//! `command_failed` notices. Blank lines and lines starting with `#` are
//! skipped.

use anyhow::anyhow;
use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::errors::{CpmflowError, Result};
use crate::notify::ScheduleEvent;
use crate::service::TaskService;
use crate::task::{Task, TaskDraft};
use crate::types::{EmployeeId, TaskId};

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionCommand {
    Create {
        task: TaskDraft,
    },
    Update {
        id: TaskId,
        task: TaskDraft,
    },
    Delete {
        id: TaskId,
    },
    Refresh,
    List {
        #[serde(default)]
        assignee: Option<EmployeeId>,
    },
}

impl SessionCommand {
    pub fn op(&self) -> &'static str {
        match self {
            SessionCommand::Create { .. } => "create",
            SessionCommand::Update { .. } => "update",
            SessionCommand::Delete { .. } => "delete",
            SessionCommand::Refresh => "refresh",
            SessionCommand::List { .. } => "list",
        }
    }
}

/// What a command produced besides the broadcast events.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    Done,
    Tasks(Vec<Task>),
}

/// Parse one input line. `Ok(None)` for blank and comment lines.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Execute one command against the service.
pub async fn apply_command(service: &TaskService, command: SessionCommand) -> Result<CommandReply> {
    match command {
        SessionCommand::Create { task } => {
            service.create_task(task).await?;
        }
        SessionCommand::Update { id, task } => {
            service.update_task(id, task).await?;
        }
        SessionCommand::Delete { id } => {
            service.delete_task(id).await?;
        }
        SessionCommand::Refresh => {
            service.refresh_schedule().await?;
        }
        SessionCommand::List { assignee } => {
            return Ok(CommandReply::Tasks(service.list_tasks(assignee)?));
        }
    }
    Ok(CommandReply::Done)
}

/// Run a session until `input` reaches EOF.
///
/// The session subscribes as an observer, so `output` sees `initial_tasks`
/// and `schedule_updated` first. Each command's events are written before
/// its `task_list` or `command_failed` line, and events caused by other
/// clients are written as they arrive. Returns the writer at EOF.
pub async fn run_session<R, W>(service: &TaskService, input: R, mut output: W) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut subscription = service.subscribe().await?;
    let observer_id = subscription.id();
    info!(observer = observer_id, "session started");

    let mut lines = input.lines();
    loop {
        tokio::select! {
            biased;

            event = subscription.recv() => match event {
                Some(event) => write_event(&mut output, &event).await?,
                None => {
                    return Err(CpmflowError::Other(anyhow!(
                        "session observer {observer_id} was dropped by the engine"
                    )));
                }
            },

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let reply = handle_line(service, &line).await?;

                // The engine publishes before it replies, so this command's
                // events are already queued.
                while let Some(event) = subscription.try_recv() {
                    write_event(&mut output, &event).await?;
                }
                if let Some(reply) = reply {
                    write_line(&mut output, &reply).await?;
                }
            }
        }
    }

    info!("session input closed");
    while let Some(event) = subscription.try_recv() {
        write_event(&mut output, &event).await?;
    }
    service.engine().unsubscribe(observer_id).await?;
    Ok(output)
}

/// Run one input line. Returns the reply line to write after the command's
/// events, if any.
async fn handle_line(service: &TaskService, line: &str) -> Result<Option<String>> {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(None),
        Err(err) => {
            warn!(error = %err, "ignoring malformed session line");
            return Ok(Some(failure_line("parse", &err)));
        }
    };

    let op = command.op();
    debug!(op, "session command");
    match apply_command(service, command).await {
        Ok(CommandReply::Done) => Ok(None),
        Ok(CommandReply::Tasks(tasks)) => Ok(Some(serde_json::to_string(
            &json!({ "kind": "task_list", "tasks": tasks }),
        )?)),
        Err(err @ CpmflowError::EngineUnavailable(_)) => Err(err),
        Err(err) => {
            warn!(op, error = %err, "session command rejected");
            Ok(Some(failure_line(op, &err)))
        }
    }
}

fn failure_line(op: &str, err: &CpmflowError) -> String {
    json!({ "kind": "command_failed", "op": op, "error": err.to_string() }).to_string()
}

async fn write_event<W>(output: &mut W, event: &ScheduleEvent) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_line(output, &event.to_json()?).await
}

async fn write_line<W>(output: &mut W, line: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
