// src/dag/sequencer.rs

//! Topological ordering of the dependency graph.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use thiserror::Error;
use tracing::{trace, warn};

use crate::dag::graph::DependencyGraph;
use crate::types::TaskId;

/// Raised when the dependency edges contain at least one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle among tasks {unresolved:?}")]
pub struct CycleDetected {
    /// Tasks that never reached in-degree zero: the members of every cycle
    /// plus everything downstream of one.
    pub unresolved: Vec<TaskId>,
}

/// Order tasks so that every task comes after all of its dependencies.
///
/// Kahn's algorithm: repeatedly take a node with no unprocessed dependencies.
/// When several are eligible the smallest id goes first, which makes the
/// output reproducible. The choice does not affect the computed timings.
pub fn topological_order(graph: &DependencyGraph) -> Result<Vec<TaskId>, CycleDetected> {
    let mut remaining: BTreeMap<TaskId, usize> = graph
        .nodes()
        .map(|node| (node.id, node.in_degree()))
        .collect();

    let mut ready: BinaryHeap<Reverse<TaskId>> = remaining
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&id, _)| Reverse(id))
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(Reverse(id)) = ready.pop() {
        order.push(id);
        for &succ in graph.dependents_of(id) {
            if let Some(degree) = remaining.get_mut(&succ) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }
    }

    if order.len() < graph.len() {
        let unresolved: Vec<TaskId> = remaining
            .into_iter()
            .filter(|&(_, degree)| degree > 0)
            .map(|(id, _)| id)
            .collect();
        warn!(
            sequenced = order.len(),
            total = graph.len(),
            ?unresolved,
            "dependency cycle detected; no valid schedule"
        );
        return Err(CycleDetected { unresolved });
    }

    trace!(?order, "topological order");
    Ok(order)
}
