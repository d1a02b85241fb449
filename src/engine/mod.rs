// src/engine/mod.rs

//! Change pipeline for cpmflow.
//!
//! The engine runtime owns the [`ChangeNotifier`] and reacts to:
//! - accepted task mutations (recompute + broadcast)
//! - on-demand refreshes
//! - observers connecting and disconnecting
//! - shutdown requests
//!
//! Callers reach it through an [`EngineHandle`]; the async loop lives in
//! [`runtime`]. Messages are processed one at a time, so broadcasts leave
//! the engine in the order their mutations reached it.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::dag::ScheduleSnapshot;
use crate::errors::Result;
use crate::notify::{ChangeNotifier, ObserverId, Subscription, TaskMutation};
use crate::store::TaskStore;

pub mod handle;
pub mod runtime;

pub use handle::EngineHandle;
pub use runtime::Runtime;

/// Default per-observer queue length.
pub const DEFAULT_OBSERVER_BUFFER: usize = 64;

/// Default engine inbox length.
pub const DEFAULT_ENGINE_QUEUE: usize = 64;

/// Sizing of the engine's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Capacity of the engine inbox.
    pub inbox_capacity: usize,
    /// Capacity of each observer's event queue.
    pub observer_buffer: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            inbox_capacity: DEFAULT_ENGINE_QUEUE,
            observer_buffer: DEFAULT_OBSERVER_BUFFER,
        }
    }
}

/// Messages flowing into the engine runtime.
#[derive(Debug)]
pub enum EngineEvent {
    /// The store accepted a mutation; recompute and broadcast.
    TaskChanged {
        mutation: TaskMutation,
        reply: oneshot::Sender<Result<ScheduleSnapshot>>,
    },
    /// Recompute and broadcast the schedule without a point event.
    Refresh {
        reply: oneshot::Sender<Result<ScheduleSnapshot>>,
    },
    /// Register a new observer.
    ObserverConnected {
        reply: oneshot::Sender<Result<Subscription>>,
    },
    ObserverDisconnected {
        id: ObserverId,
    },
    /// Stop the runtime loop.
    ShutdownRequested,
}

/// Spawn the engine runtime on the current Tokio runtime.
pub fn spawn_engine(
    store: Arc<dyn TaskStore>,
    options: EngineOptions,
) -> (EngineHandle, JoinHandle<Result<()>>) {
    let (tx, rx) = mpsc::channel::<EngineEvent>(options.inbox_capacity.max(1));
    let notifier = ChangeNotifier::new(store, options.observer_buffer);
    let runtime = Runtime::new(notifier, rx);
    let join = tokio::spawn(runtime.run());
    (EngineHandle::new(tx), join)
}
