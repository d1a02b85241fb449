// src/store/memory.rs

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use tracing::debug;

use super::TaskStore;
use crate::task::{Task, TaskDraft};
use crate::types::TaskId;

#[derive(Debug, Default)]
struct Inner {
    tasks: BTreeMap<TaskId, Task>,
    /// Highest id ever handed out; ids are never reused after deletion.
    last_id: TaskId,
}

/// In-memory [`TaskStore`] backed by a mutex-guarded map.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with tasks that already carry their ids (e.g. loaded
    /// from a project file). Later inserts continue after the highest id.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut inner = Inner::default();
        for task in tasks {
            inner.last_id = inner.last_id.max(task.id);
            inner.tasks.insert(task.id, task);
        }
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.tasks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("memory task store mutex poisoned"))
    }
}

impl TaskStore for MemoryTaskStore {
    fn list_all_tasks(&self) -> Result<Vec<Task>> {
        let inner = self.lock()?;
        Ok(inner.tasks.values().cloned().collect())
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        let inner = self.lock()?;
        Ok(inner.tasks.get(&id).cloned())
    }

    fn insert_task(&self, draft: &TaskDraft) -> Result<Task> {
        let mut inner = self.lock()?;
        inner.last_id += 1;
        let task = Task::from_draft(inner.last_id, draft.clone());
        inner.tasks.insert(task.id, task.clone());
        debug!(id = task.id, "store: inserted task");
        Ok(task)
    }

    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> Result<Option<Task>> {
        let mut inner = self.lock()?;
        match inner.tasks.get_mut(&id) {
            Some(slot) => {
                *slot = Task::from_draft(id, draft.clone());
                debug!(id, "store: updated task");
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete_task(&self, id: TaskId) -> Result<bool> {
        let mut inner = self.lock()?;
        let removed = inner.tasks.remove(&id).is_some();
        if removed {
            debug!(id, "store: deleted task");
        }
        Ok(removed)
    }
}
