// src/notify/notifier.rs

use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::{ScheduleSnapshot, compute_schedule};
use crate::errors::{CpmflowError, Result};
use crate::notify::events::{ScheduleEvent, TaskMutation};
use crate::notify::registry::{ObserverId, ObserverRegistry, Subscription};
use crate::store::TaskStore;
use crate::task::Task;

/// Recomputes the schedule from the store and fans it out to observers.
///
/// Every operation re-reads the full task set. If that read fails, nothing
/// is published and the store error is returned.
#[derive(Debug)]
pub struct ChangeNotifier {
    store: Arc<dyn TaskStore>,
    registry: ObserverRegistry,
}

impl ChangeNotifier {
    pub fn new(store: Arc<dyn TaskStore>, observer_buffer: usize) -> Self {
        Self {
            store,
            registry: ObserverRegistry::new(observer_buffer),
        }
    }

    pub fn registry(&self) -> &ObserverRegistry {
        &self.registry
    }

    /// Compute the schedule of the current task set without publishing it.
    pub fn current_schedule(&self) -> Result<ScheduleSnapshot> {
        let (_, snapshot) = self.read_and_compute()?;
        Ok(snapshot)
    }

    /// Publish the point events of `mutation` followed by the recomputed
    /// schedule.
    pub fn publish_mutation(&self, mutation: &TaskMutation) -> Result<ScheduleSnapshot> {
        let (_, snapshot) = self.read_and_compute()?;

        let mut events = mutation.point_events();
        events.push(ScheduleEvent::ScheduleUpdated(snapshot.clone()));

        let report = self.registry.broadcast(&events);
        info!(
            task = mutation.task_id(),
            project_duration = snapshot.project_duration,
            observers = report.delivered,
            "published task change"
        );
        Ok(snapshot)
    }

    /// Publish a recomputed schedule with no point event.
    pub fn refresh(&self) -> Result<ScheduleSnapshot> {
        let (_, snapshot) = self.read_and_compute()?;
        self.registry
            .broadcast(&[ScheduleEvent::ScheduleUpdated(snapshot.clone())]);
        Ok(snapshot)
    }

    /// Register a new observer. Its queue starts with the full task set and
    /// the current schedule, in that order.
    pub fn connect(&self) -> Result<Subscription> {
        let (tasks, snapshot) = self.read_and_compute()?;
        let subscription = self.registry.register(vec![
            ScheduleEvent::InitialTasks { tasks },
            ScheduleEvent::ScheduleUpdated(snapshot),
        ]);
        info!(observer = subscription.id(), "observer connected");
        Ok(subscription)
    }

    pub fn disconnect(&self, id: ObserverId) -> bool {
        let removed = self.registry.unregister(id);
        if removed {
            info!(observer = id, "observer disconnected");
        }
        removed
    }

    fn read_and_compute(&self) -> Result<(Vec<Task>, ScheduleSnapshot)> {
        let tasks = self.store.list_all_tasks().map_err(CpmflowError::Store)?;
        debug!(tasks = tasks.len(), "recomputing schedule");
        let snapshot = compute_schedule(&tasks);
        Ok((tasks, snapshot))
    }
}
