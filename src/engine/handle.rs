// src/engine/handle.rs

use tokio::sync::{mpsc, oneshot};

use crate::dag::ScheduleSnapshot;
use crate::errors::{CpmflowError, Result};
use crate::notify::{ObserverId, Subscription, TaskMutation};

use super::EngineEvent;

/// Cloneable sender side of the engine inbox.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineEvent>,
}

impl EngineHandle {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }

    /// Report an accepted mutation and wait until its events are published.
    ///
    /// Fails with [`CpmflowError::Store`] if the recompute could not read the
    /// store; in that case no observer saw anything.
    pub async fn task_changed(&self, mutation: TaskMutation) -> Result<ScheduleSnapshot> {
        self.request(|reply| EngineEvent::TaskChanged { mutation, reply })
            .await
    }

    /// Recompute and broadcast the current schedule.
    pub async fn refresh(&self) -> Result<ScheduleSnapshot> {
        self.request(|reply| EngineEvent::Refresh { reply }).await
    }

    /// Register a new observer.
    pub async fn subscribe(&self) -> Result<Subscription> {
        self.request(|reply| EngineEvent::ObserverConnected { reply })
            .await
    }

    pub async fn unsubscribe(&self, id: ObserverId) -> Result<()> {
        self.send(EngineEvent::ObserverDisconnected { id }).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(EngineEvent::ShutdownRequested).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T>>) -> EngineEvent,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(make(reply_tx)).await?;
        reply_rx.await.map_err(|_| {
            CpmflowError::EngineUnavailable("engine dropped the request".to_string())
        })?
    }

    async fn send(&self, event: EngineEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| CpmflowError::EngineUnavailable("engine inbox closed".to_string()))
    }
}
