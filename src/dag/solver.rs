// src/dag/solver.rs

//! Critical path method: forward pass, backward pass, float.

use std::collections::BTreeMap;

use crate::dag::graph::DependencyGraph;
use crate::dag::snapshot::{ScheduleEntry, ScheduleSnapshot};
use crate::types::TaskId;

#[derive(Debug, Clone, Copy, Default)]
struct Timing {
    es: i64,
    ef: i64,
    ls: i64,
    lf: i64,
}

/// Solve a graph given a valid topological `order` of all its nodes.
///
/// Forward pass: a task with no dependencies starts at day 0, otherwise at
/// the latest finish among its dependencies. Backward pass: a task with no
/// dependents must finish by the project duration, otherwise by the earliest
/// latest-start among its dependents. Durations are whole days, so float is
/// exact and a task is critical iff its float is zero.
pub fn solve(graph: &DependencyGraph, order: &[TaskId]) -> ScheduleSnapshot {
    debug_assert_eq!(order.len(), graph.len(), "order must cover every node");

    if order.is_empty() {
        return ScheduleSnapshot::empty();
    }

    let mut timings: BTreeMap<TaskId, Timing> = BTreeMap::new();

    for &id in order {
        let duration = graph.duration_of(id).unwrap_or(1);
        let es = graph
            .dependencies_of(id)
            .iter()
            .filter_map(|dep| timings.get(dep))
            .map(|t| t.ef)
            .max()
            .unwrap_or(0);
        timings.insert(
            id,
            Timing {
                es,
                ef: es + duration,
                ..Timing::default()
            },
        );
    }

    let project_duration = timings.values().map(|t| t.ef).max().unwrap_or(0);

    for &id in order.iter().rev() {
        let duration = graph.duration_of(id).unwrap_or(1);
        let lf = graph
            .dependents_of(id)
            .iter()
            .filter_map(|succ| timings.get(succ))
            .map(|t| t.ls)
            .min()
            .unwrap_or(project_duration);
        if let Some(timing) = timings.get_mut(&id) {
            timing.lf = lf;
            timing.ls = lf - duration;
        }
    }

    let mut entries = Vec::with_capacity(timings.len());
    let mut critical_task_ids = Vec::new();

    for (id, t) in timings {
        let float = t.ls - t.es;
        let critical = float == 0;
        if critical {
            critical_task_ids.push(id);
        }
        entries.push(ScheduleEntry {
            id,
            earliest_start: t.es,
            earliest_finish: t.ef,
            latest_start: t.ls,
            latest_finish: t.lf,
            float,
            duration: t.ef - t.es,
            critical,
        });
    }

    ScheduleSnapshot {
        entries,
        critical_task_ids,
        project_duration,
        cycle: None,
    }
}
