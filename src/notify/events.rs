// src/notify/events.rs

//! Event payloads delivered to observers.

use serde::{Deserialize, Serialize};

use crate::dag::ScheduleSnapshot;
use crate::errors::Result;
use crate::task::Task;
use crate::types::{TaskId, TaskStatus};

/// Tagged payload sent to every observer.
///
/// Serialized with a `kind` discriminator, e.g.
/// `{"kind":"task_deleted","id":3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleEvent {
    TaskCreated {
        task: Task,
    },
    TaskUpdated {
        task: Task,
    },
    /// Status-only view of an update, for boards that move cards between
    /// columns.
    TaskMoved {
        id: TaskId,
        status: TaskStatus,
    },
    TaskDeleted {
        id: TaskId,
    },
    ScheduleUpdated(ScheduleSnapshot),
    /// Sent once to a newly registered observer.
    InitialTasks {
        tasks: Vec<Task>,
    },
}

impl ScheduleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleEvent::TaskCreated { .. } => "task_created",
            ScheduleEvent::TaskUpdated { .. } => "task_updated",
            ScheduleEvent::TaskMoved { .. } => "task_moved",
            ScheduleEvent::TaskDeleted { .. } => "task_deleted",
            ScheduleEvent::ScheduleUpdated(_) => "schedule_updated",
            ScheduleEvent::InitialTasks { .. } => "initial_tasks",
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Longest batch a single publish produces: `task_updated` and `task_moved`
/// followed by `schedule_updated`.
pub const MAX_EVENT_BATCH: usize = 3;

/// An accepted change to the task set.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskMutation {
    Created(Task),
    Updated(Task),
    Deleted(TaskId),
}

impl TaskMutation {
    pub fn task_id(&self) -> TaskId {
        match self {
            TaskMutation::Created(task) | TaskMutation::Updated(task) => task.id,
            TaskMutation::Deleted(id) => *id,
        }
    }

    /// Point events describing this mutation, in delivery order. They always
    /// precede the recomputed schedule.
    pub fn point_events(&self) -> Vec<ScheduleEvent> {
        match self {
            TaskMutation::Created(task) => vec![ScheduleEvent::TaskCreated { task: task.clone() }],
            TaskMutation::Updated(task) => vec![
                ScheduleEvent::TaskUpdated { task: task.clone() },
                ScheduleEvent::TaskMoved {
                    id: task.id,
                    status: task.status,
                },
            ],
            TaskMutation::Deleted(id) => vec![ScheduleEvent::TaskDeleted { id: *id }],
        }
    }
}
