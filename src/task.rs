// src/task.rs

//! Task records as stored by the record store and seen by observers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{CpmflowError, Result};
use crate::types::{Dependencies, EmployeeId, TaskId, TaskStatus};

/// A stored work item.
///
/// The scheduling engine only ever reads tasks; all mutation goes through the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub dependencies: Dependencies,
    #[serde(default, alias = "assigned_employee")]
    pub assignee: Option<EmployeeId>,
}

impl Task {
    /// Build a stored task from a draft and the id the store assigned to it.
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            dependencies: draft.dependencies,
            assignee: draft.assignee,
        }
    }
}

/// Field set of a create or update request (everything except the id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub dependencies: Dependencies,
    #[serde(default, alias = "assigned_employee")]
    pub assignee: Option<EmployeeId>,
}

impl TaskDraft {
    /// Check the request-level invariants: a non-blank title and an end date
    /// that does not precede the start date.
    ///
    /// Dependency references are not checked here; the engine drops dangling
    /// ones.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CpmflowError::InvalidTask("title must not be empty".to_string()));
        }
        if self.end_date < self.start_date {
            return Err(CpmflowError::InvalidTask(format!(
                "end_date {} precedes start_date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }
}

impl From<Task> for TaskDraft {
    fn from(task: Task) -> Self {
        Self {
            title: task.title,
            status: task.status,
            start_date: task.start_date,
            end_date: task.end_date,
            dependencies: task.dependencies,
            assignee: task.assignee,
        }
    }
}
