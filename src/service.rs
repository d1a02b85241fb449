// src/service.rs

//! Task mutation handlers.
//!
//! Each mutation is validated, applied to the store and then reported to the
//! engine, which publishes the point event and the recomputed schedule
//! before the call returns.

use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::ScheduleSnapshot;
use crate::engine::EngineHandle;
use crate::errors::{CpmflowError, Result};
use crate::notify::{Subscription, TaskMutation};
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};
use crate::types::{EmployeeId, TaskId};

#[derive(Debug, Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    engine: EngineHandle,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, engine: EngineHandle) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// All tasks, or only those assigned to `assignee`.
    pub fn list_tasks(&self, assignee: Option<EmployeeId>) -> Result<Vec<Task>> {
        let tasks = self.store.list_all_tasks().map_err(CpmflowError::Store)?;
        Ok(match assignee {
            Some(employee) => tasks
                .into_iter()
                .filter(|t| t.assignee == Some(employee))
                .collect(),
            None => tasks,
        })
    }

    pub fn get_task(&self, id: TaskId) -> Result<Task> {
        self.store
            .get_task(id)
            .map_err(CpmflowError::Store)?
            .ok_or(CpmflowError::TaskNotFound(id))
    }

    pub async fn create_task(&self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = self.store.insert_task(&draft).map_err(CpmflowError::Store)?;
        info!(id = task.id, title = %task.title, "task created");

        self.engine
            .task_changed(TaskMutation::Created(task.clone()))
            .await?;
        Ok(task)
    }

    pub async fn update_task(&self, id: TaskId, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = self
            .store
            .update_task(id, &draft)
            .map_err(CpmflowError::Store)?
            .ok_or(CpmflowError::TaskNotFound(id))?;
        info!(id, status = %task.status, "task updated");

        self.engine
            .task_changed(TaskMutation::Updated(task.clone()))
            .await?;
        Ok(task)
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        let removed = self.store.delete_task(id).map_err(CpmflowError::Store)?;
        if !removed {
            return Err(CpmflowError::TaskNotFound(id));
        }
        info!(id, "task deleted");

        self.engine.task_changed(TaskMutation::Deleted(id)).await?;
        Ok(())
    }

    /// Recompute and broadcast the schedule on demand.
    pub async fn refresh_schedule(&self) -> Result<ScheduleSnapshot> {
        debug!("schedule refresh requested");
        self.engine.refresh().await
    }

    pub async fn subscribe(&self) -> Result<Subscription> {
        self.engine.subscribe().await
    }
}
