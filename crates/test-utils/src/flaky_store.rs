use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, bail};
use cpmflow::store::{MemoryTaskStore, TaskStore};
use cpmflow::task::{Task, TaskDraft};
use cpmflow::types::TaskId;

/// A store that wraps `MemoryTaskStore` and can be told to fail full reads.
///
/// Mutations keep working while reads fail, which reproduces a store that
/// accepts a write and then errors on the follow-up `list_all_tasks`.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: MemoryTaskStore,
    fail_reads: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new(inner: MemoryTaskStore) -> Self {
        Self {
            inner,
            fail_reads: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl TaskStore for FlakyStore {
    fn list_all_tasks(&self) -> Result<Vec<Task>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("simulated read failure");
        }
        self.inner.list_all_tasks()
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.inner.get_task(id)
    }

    fn insert_task(&self, draft: &TaskDraft) -> Result<Task> {
        self.inner.insert_task(draft)
    }

    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> Result<Option<Task>> {
        self.inner.update_task(id, draft)
    }

    fn delete_task(&self, id: TaskId) -> Result<bool> {
        self.inner.delete_task(id)
    }
}
