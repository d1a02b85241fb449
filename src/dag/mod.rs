// src/dag/mod.rs

//! Scheduling engine.
//!
//! - [`graph`] builds the id-keyed dependency graph from a task collection.
//! - [`sequencer`] orders it topologically and detects cycles.
//! - [`solver`] runs the CPM forward and backward passes.
//! - [`snapshot`] holds the immutable result and the
//!   [`compute_schedule`] entry point tying the three together.

pub mod graph;
pub mod sequencer;
pub mod snapshot;
pub mod solver;

pub use graph::{DependencyGraph, PlannedTask, duration_days};
pub use sequencer::{CycleDetected, topological_order};
pub use snapshot::{ScheduleEntry, ScheduleSnapshot, compute_schedule};
pub use solver::solve;
