// src/store/mod.rs

//! Record store contract.
//!
//! The authoritative task set lives outside the scheduling engine. The engine
//! and the task service talk to it through [`TaskStore`]; [`MemoryTaskStore`]
//! is the in-process implementation used by the CLI and the tests.

use std::fmt::Debug;

use anyhow::Result;

use crate::task::{Task, TaskDraft};
use crate::types::TaskId;

pub mod memory;

pub use memory::MemoryTaskStore;

/// Abstract task store.
///
/// Every call observes a consistent state of the store. Concurrent mutations
/// are serialized by the implementation, not by callers.
pub trait TaskStore: Send + Sync + Debug {
    /// Every task currently stored, in ascending id order.
    fn list_all_tasks(&self) -> Result<Vec<Task>>;

    fn get_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// Insert a new task, assigning it a fresh id.
    fn insert_task(&self, draft: &TaskDraft) -> Result<Task>;

    /// Replace all fields of an existing task. `None` if the id is unknown.
    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> Result<Option<Task>>;

    /// Remove a task. `false` if the id is unknown.
    fn delete_task(&self, id: TaskId) -> Result<bool>;
}
