// src/dag/graph.rs

use std::collections::BTreeMap;

use tracing::debug;

use crate::task::Task;
use crate::types::{Dependencies, TaskId};

/// Per-task record produced by the graph build: the parsed dependency set as
/// stored, the references that survived validation, and the whole-day
/// duration.
#[derive(Debug, Clone)]
pub struct PlannedTask {
    pub id: TaskId,
    /// Dependency ids exactly as parsed from the task (may include dangling
    /// or self references).
    pub declared: Dependencies,
    /// Dependencies that point at another task present in this build.
    pub deps: Vec<TaskId>,
    /// Direct dependents: tasks that list this one as a valid dependency.
    pub dependents: Vec<TaskId>,
    /// Whole days, never less than one.
    pub duration: i64,
}

impl PlannedTask {
    /// Number of valid incoming edges.
    pub fn in_degree(&self) -> usize {
        self.deps.len()
    }
}

/// Id-keyed dependency graph, rebuilt from scratch for every schedule run.
///
/// Edge direction is dependency -> dependent. Dangling and self references
/// are dropped during the build, so every edge joins two distinct tasks of
/// the input set.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<TaskId, PlannedTask>,
}

impl DependencyGraph {
    /// Build the graph from the full current task collection.
    pub fn build(tasks: &[Task]) -> Self {
        let mut nodes: BTreeMap<TaskId, PlannedTask> = BTreeMap::new();

        // First pass: one node per task.
        for task in tasks {
            nodes.insert(
                task.id,
                PlannedTask {
                    id: task.id,
                    declared: task.dependencies.clone(),
                    deps: Vec::new(),
                    dependents: Vec::new(),
                    duration: duration_days(task),
                },
            );
        }

        // Second pass: keep only references to other known tasks.
        let mut dropped = 0usize;
        for task in tasks {
            for dep in task.dependencies.iter() {
                if dep == task.id || !nodes.contains_key(&dep) {
                    dropped += 1;
                    continue;
                }
                if let Some(node) = nodes.get_mut(&task.id) {
                    if node.deps.contains(&dep) {
                        continue;
                    }
                    node.deps.push(dep);
                }
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(task.id);
                }
            }
        }

        if dropped > 0 {
            debug!(dropped, "dropped dangling or self dependency references");
        }

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All task ids in ascending order.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node(&self, id: TaskId) -> Option<&PlannedTask> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PlannedTask> {
        self.nodes.values()
    }

    /// Valid direct dependencies of a task.
    pub fn dependencies_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Direct dependents (successors) of a task.
    pub fn dependents_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    pub fn duration_of(&self, id: TaskId) -> Option<i64> {
        self.nodes.get(&id).map(|n| n.duration)
    }
}

/// `max(1, end - start)` in whole calendar days.
///
/// A task starting and ending on the same day lasts one day. An inverted
/// range also clamps to one.
pub fn duration_days(task: &Task) -> i64 {
    (task.end_date - task.start_date).num_days().max(1)
}
