// tests/observer_registry.rs

mod common;
use crate::common::builders::{TaskBuilder, diamond};
use crate::common::flaky_store::FlakyStore;
use crate::common::init_tracing;

use std::sync::Arc;

use cpmflow::errors::CpmflowError;
use cpmflow::notify::{
    ChangeNotifier, MAX_EVENT_BATCH, ObserverRegistry, ScheduleEvent, TaskMutation,
};
use cpmflow::store::{MemoryTaskStore, TaskStore};
use cpmflow::types::TaskStatus;

fn deleted(id: u64) -> ScheduleEvent {
    ScheduleEvent::TaskDeleted { id }
}

fn drain(sub: &mut cpmflow::notify::Subscription) -> Vec<ScheduleEvent> {
    let mut out = Vec::new();
    while let Some(event) = sub.try_recv() {
        out.push(event);
    }
    out
}

#[test]
fn broadcast_reaches_every_observer_in_order() {
    init_tracing();
    let registry = ObserverRegistry::new(8);
    let mut a = registry.register(Vec::new());
    let mut b = registry.register(Vec::new());
    assert_ne!(a.id(), b.id());
    assert_eq!(registry.len(), 2);

    let report = registry.broadcast(&[deleted(1), deleted(2)]);
    assert_eq!(report.delivered, 2);
    assert!(report.dropped.is_empty());

    assert_eq!(drain(&mut a), vec![deleted(1), deleted(2)]);
    assert_eq!(drain(&mut b), vec![deleted(1), deleted(2)]);
}

#[test]
fn initial_events_come_before_broadcasts() {
    init_tracing();
    let registry = ObserverRegistry::new(4);
    let mut sub = registry.register(vec![deleted(10), deleted(11)]);

    registry.broadcast(&[deleted(12)]);

    assert_eq!(drain(&mut sub), vec![deleted(10), deleted(11), deleted(12)]);
}

#[test]
fn initial_batch_larger_than_capacity_is_kept_whole() {
    init_tracing();
    let registry = ObserverRegistry::new(1);
    let initial: Vec<_> = (1..=5).map(deleted).collect();
    let mut sub = registry.register(initial);

    assert_eq!(drain(&mut sub).len(), 5);
    assert!(registry.contains(sub.id()));
}

#[test]
fn full_queue_drops_only_the_slow_observer() {
    init_tracing();
    let registry = ObserverRegistry::new(3);
    let mut fast = registry.register(Vec::new());
    let mut slow = registry.register(Vec::new());

    registry.broadcast(&[deleted(1)]);
    drain(&mut fast);
    // `slow` still holds event 1, leaving room for two of the next three.
    let report = registry.broadcast(&[deleted(2), deleted(3), deleted(4)]);

    assert_eq!(report.delivered, 1);
    assert_eq!(report.dropped, vec![slow.id()]);
    assert!(!registry.contains(slow.id()));
    assert!(registry.contains(fast.id()));
    assert_eq!(drain(&mut fast), vec![deleted(2), deleted(3), deleted(4)]);
    // Nothing of the batch that did not fit reached the slow observer.
    assert_eq!(drain(&mut slow), vec![deleted(1)]);
}

#[test]
fn caught_up_observer_receives_a_whole_update_with_small_buffer() {
    init_tracing();
    let store = Arc::new(MemoryTaskStore::with_tasks(diamond()));
    let notifier = ChangeNotifier::new(Arc::clone(&store) as Arc<dyn TaskStore>, 2);
    let mut sub = notifier.connect().unwrap();
    assert_eq!(drain(&mut sub).len(), 2);

    for status in [TaskStatus::InProgress, TaskStatus::Done] {
        let task = TaskBuilder::new(2)
            .title("B")
            .lasting(2)
            .after(1)
            .status(status)
            .build();
        store.update_task(2, &task.clone().into()).unwrap();
        notifier
            .publish_mutation(&TaskMutation::Updated(task))
            .unwrap();

        let kinds: Vec<_> = drain(&mut sub).iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, ["task_updated", "task_moved", "schedule_updated"]);
    }
    assert!(notifier.registry().contains(sub.id()));
}

#[test]
fn closed_receiver_is_dropped_on_next_broadcast() {
    init_tracing();
    let registry = ObserverRegistry::new(4);
    let gone = registry.register(Vec::new());
    let gone_id = gone.id();
    drop(gone);

    let report = registry.broadcast(&[deleted(1)]);

    assert_eq!(report.delivered, 0);
    assert_eq!(report.dropped, vec![gone_id]);
    assert!(registry.is_empty());
}

#[test]
fn unregister_is_idempotent() {
    init_tracing();
    let registry = ObserverRegistry::new(4);
    let mut sub = registry.register(Vec::new());

    assert!(registry.unregister(sub.id()));
    assert!(!registry.unregister(sub.id()));

    let report = registry.broadcast(&[deleted(1)]);
    assert_eq!(report.delivered, 0);
    assert!(sub.try_recv().is_none());
}

#[test]
fn capacity_is_raised_to_one_full_batch() {
    assert_eq!(ObserverRegistry::new(0).capacity(), MAX_EVENT_BATCH);
    assert_eq!(ObserverRegistry::new(2).capacity(), MAX_EVENT_BATCH);
    assert_eq!(ObserverRegistry::new(16).capacity(), 16);
}

#[test]
fn connect_sends_task_set_then_schedule() {
    init_tracing();
    let store = Arc::new(MemoryTaskStore::with_tasks(diamond()));
    let notifier = ChangeNotifier::new(store, 8);

    let mut sub = notifier.connect().unwrap();
    let events = drain(&mut sub);

    assert_eq!(events.len(), 2);
    match &events[0] {
        ScheduleEvent::InitialTasks { tasks } => assert_eq!(tasks.len(), 4),
        other => panic!("expected initial_tasks, got {other:?}"),
    }
    match &events[1] {
        ScheduleEvent::ScheduleUpdated(snapshot) => {
            assert_eq!(snapshot.project_duration, 8);
            assert_eq!(snapshot.critical_task_ids, vec![1, 3, 4]);
        }
        other => panic!("expected schedule_updated, got {other:?}"),
    }
}

#[test]
fn update_publishes_point_events_then_schedule() {
    init_tracing();
    let store = Arc::new(MemoryTaskStore::with_tasks(diamond()));
    let notifier = ChangeNotifier::new(Arc::clone(&store) as Arc<dyn TaskStore>, 8);
    let mut sub = notifier.connect().unwrap();
    drain(&mut sub);

    let moved = TaskBuilder::new(2)
        .title("B")
        .lasting(2)
        .after(1)
        .status(TaskStatus::InProgress)
        .build();
    store.update_task(2, &moved.clone().into()).unwrap();
    let snapshot = notifier
        .publish_mutation(&TaskMutation::Updated(moved.clone()))
        .unwrap();

    let events = drain(&mut sub);
    let kinds: Vec<_> = events.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, ["task_updated", "task_moved", "schedule_updated"]);
    assert_eq!(
        events[1],
        ScheduleEvent::TaskMoved {
            id: 2,
            status: TaskStatus::InProgress
        }
    );
    assert_eq!(events[2], ScheduleEvent::ScheduleUpdated(snapshot));
}

#[test]
fn store_read_failure_publishes_nothing() {
    init_tracing();
    let store = FlakyStore::new(MemoryTaskStore::with_tasks(diamond()));
    let notifier = ChangeNotifier::new(Arc::new(store.clone()), 8);
    let mut sub = notifier.connect().unwrap();
    drain(&mut sub);

    store.fail_reads(true);
    let err = notifier
        .publish_mutation(&TaskMutation::Deleted(2))
        .unwrap_err();
    assert!(matches!(err, CpmflowError::Store(_)));
    assert!(err.to_string().contains("simulated read failure"));

    let err = notifier.refresh().unwrap_err();
    assert!(matches!(err, CpmflowError::Store(_)));
    assert!(notifier.connect().is_err());

    assert!(sub.try_recv().is_none());
    assert_eq!(notifier.registry().len(), 1);
}
