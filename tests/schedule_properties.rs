// tests/schedule_properties.rs

mod common;
use crate::common::builders::TaskBuilder;

use std::collections::HashSet;

use proptest::prelude::*;
use cpmflow::dag::compute_schedule;
use cpmflow::task::Task;

// Strategy to generate an acyclic task set.
// Task N may only depend on tasks 1..N, plus the occasional dangling id, so
// the set never contains a cycle.
fn acyclic_tasks_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let spans = proptest::collection::vec(0u64..6, num_tasks);
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_tasks,
        );
        let dangling = proptest::collection::vec(proptest::bool::weighted(0.1), num_tasks);

        (spans, deps, dangling).prop_map(move |(spans, raw_deps, dangling)| {
            let mut tasks = Vec::with_capacity(num_tasks);
            for i in 0..num_tasks {
                let id = (i + 1) as u64;
                let mut builder = TaskBuilder::new(id).starting(i as u64 % 3).lasting(spans[i]);

                let mut picked = HashSet::new();
                if i > 0 {
                    for dep in &raw_deps[i] {
                        picked.insert((dep % i) as u64 + 1);
                    }
                }
                for dep in picked {
                    builder = builder.after(dep);
                }
                if dangling[i] {
                    builder = builder.after(10_000 + id);
                }
                tasks.push(builder.build());
            }
            tasks
        })
    })
}

proptest! {
    #[test]
    fn timings_are_ordered_and_float_is_non_negative(tasks in acyclic_tasks_strategy(12)) {
        let snapshot = compute_schedule(&tasks);

        prop_assert!(!snapshot.is_unschedulable());
        prop_assert_eq!(snapshot.entries.len(), tasks.len());

        for e in &snapshot.entries {
            prop_assert!(e.earliest_start <= e.earliest_finish);
            prop_assert!(e.earliest_finish <= snapshot.project_duration);
            prop_assert!(e.latest_start <= e.latest_finish);
            prop_assert!(e.latest_finish <= snapshot.project_duration);
            prop_assert!(e.duration >= 1);
            prop_assert_eq!(e.float, e.latest_start - e.earliest_start);
            prop_assert!(e.float >= 0);
            prop_assert_eq!(e.critical, e.float == 0);
        }
    }

    #[test]
    fn critical_set_is_non_empty_and_reaches_project_end(tasks in acyclic_tasks_strategy(12)) {
        let snapshot = compute_schedule(&tasks);

        prop_assert!(!snapshot.critical_task_ids.is_empty());
        let ends_on_time = snapshot
            .critical_task_ids
            .iter()
            .filter_map(|&id| snapshot.entry(id))
            .any(|e| e.earliest_finish == snapshot.project_duration);
        prop_assert!(ends_on_time);
    }

    #[test]
    fn dependencies_finish_before_dependents_start(tasks in acyclic_tasks_strategy(12)) {
        let snapshot = compute_schedule(&tasks);
        let ids: HashSet<u64> = tasks.iter().map(|t| t.id).collect();

        for task in &tasks {
            let entry = snapshot.entry(task.id).unwrap();
            for dep in task.dependencies.iter().filter(|d| ids.contains(d)) {
                let dep_entry = snapshot.entry(dep).unwrap();
                prop_assert!(dep_entry.earliest_finish <= entry.earliest_start);
                prop_assert!(dep_entry.latest_finish <= entry.latest_start);
            }
        }
    }

    #[test]
    fn removing_a_task_respects_criticality(
        tasks in acyclic_tasks_strategy(10),
        pick in any::<usize>(),
    ) {
        let full = compute_schedule(&tasks);
        let removed = tasks[pick % tasks.len()].id;
        let rest: Vec<Task> = tasks.iter().filter(|t| t.id != removed).cloned().collect();
        let reduced = compute_schedule(&rest);

        if full.is_critical(removed) {
            prop_assert!(reduced.project_duration <= full.project_duration);
        } else {
            prop_assert_eq!(reduced.project_duration, full.project_duration);
        }
    }

    #[test]
    fn repeated_runs_are_identical(tasks in acyclic_tasks_strategy(12)) {
        prop_assert_eq!(compute_schedule(&tasks), compute_schedule(&tasks));
    }
}
