// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::engine::{DEFAULT_ENGINE_QUEUE, DEFAULT_OBSERVER_BUFFER, EngineOptions};
use crate::task::{Task, TaskDraft};

/// Project file exactly as read from TOML, before validation.
///
/// ```toml
/// [config]
/// observer_buffer = 64
/// strict_dependencies = false
///
/// [task.1]
/// title = "Design"
/// status = "todo"
/// start_date = "2024-01-01"
/// end_date = "2024-01-03"
///
/// [task.2]
/// title = "Build"
/// start_date = "2024-01-03"
/// end_date = "2024-01-08"
/// dependencies = "1"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectFile {
    /// Global settings from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Tasks from `[task.<id>]`, keyed by the id as written.
    #[serde(default)]
    pub task: BTreeMap<String, TaskDraft>,
}

/// `[config]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigSection {
    /// Per-observer event queue length. An observer that falls this far
    /// behind is dropped. Values below one full publish (three events) are
    /// raised to it.
    #[serde(default = "default_observer_buffer")]
    pub observer_buffer: usize,

    /// Engine inbox length.
    #[serde(default = "default_engine_queue")]
    pub engine_queue: usize,

    /// Reject dangling, self-referencing or cyclic dependencies instead of
    /// only warning about them.
    #[serde(default)]
    pub strict_dependencies: bool,
}

fn default_observer_buffer() -> usize {
    DEFAULT_OBSERVER_BUFFER
}

fn default_engine_queue() -> usize {
    DEFAULT_ENGINE_QUEUE
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            observer_buffer: default_observer_buffer(),
            engine_queue: default_engine_queue(),
            strict_dependencies: false,
        }
    }
}

impl ConfigSection {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            inbox_capacity: self.engine_queue,
            observer_buffer: self.observer_buffer,
        }
    }
}

/// Validated project file.
///
/// Only constructed through `TryFrom<RawProjectFile>`.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub config: ConfigSection,
    tasks: Vec<Task>,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(config: ConfigSection, tasks: Vec<Task>) -> Self {
        Self { config, tasks }
    }

    /// Tasks in ascending id order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}
