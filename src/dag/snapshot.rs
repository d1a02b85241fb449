// src/dag/snapshot.rs

//! Immutable result of one schedule computation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dag::graph::DependencyGraph;
use crate::dag::sequencer::topological_order;
use crate::dag::solver::solve;
use crate::task::Task;
use crate::types::TaskId;

/// Timing of one task in the project's day-indexed timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: TaskId,
    #[serde(rename = "ES")]
    pub earliest_start: i64,
    #[serde(rename = "EF")]
    pub earliest_finish: i64,
    #[serde(rename = "LS")]
    pub latest_start: i64,
    #[serde(rename = "LF")]
    pub latest_finish: i64,
    pub float: i64,
    pub duration: i64,
    pub critical: bool,
}

/// One complete computed schedule.
///
/// Entries and critical ids are in ascending id order, so two runs over the
/// same task set produce equal snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshot {
    #[serde(alias = "details")]
    pub entries: Vec<ScheduleEntry>,
    pub critical_task_ids: Vec<TaskId>,
    pub project_duration: i64,
    /// Set when the task set could not be sequenced. Not part of the wire
    /// shape: observers only see the empty schedule.
    #[serde(skip)]
    pub cycle: Option<Vec<TaskId>>,
}

impl ScheduleSnapshot {
    /// The empty schedule of an empty task set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The "no valid schedule" result for a cyclic task set.
    pub fn unschedulable(unresolved: Vec<TaskId>) -> Self {
        Self {
            cycle: Some(unresolved),
            ..Self::default()
        }
    }

    /// Whether this snapshot stands for a dependency cycle.
    pub fn is_unschedulable(&self) -> bool {
        self.cycle.is_some()
    }

    pub fn entry(&self, id: TaskId) -> Option<&ScheduleEntry> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    pub fn is_critical(&self, id: TaskId) -> bool {
        self.critical_task_ids.binary_search(&id).is_ok()
    }
}

/// Run the whole engine over a task collection: build the graph, sequence it
/// and solve it.
///
/// Never fails. A cycle yields [`ScheduleSnapshot::unschedulable`].
pub fn compute_schedule(tasks: &[Task]) -> ScheduleSnapshot {
    if tasks.is_empty() {
        return ScheduleSnapshot::empty();
    }

    let graph = DependencyGraph::build(tasks);
    let order = match topological_order(&graph) {
        Ok(order) => order,
        Err(cycle) => return ScheduleSnapshot::unschedulable(cycle.unresolved),
    };

    let snapshot = solve(&graph, &order);
    debug!(
        tasks = snapshot.entries.len(),
        project_duration = snapshot.project_duration,
        critical = ?snapshot.critical_task_ids,
        "schedule computed"
    );
    snapshot
}
