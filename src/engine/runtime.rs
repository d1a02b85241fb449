// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::notify::ChangeNotifier;

use super::EngineEvent;

/// Drives the change notifier in response to [`EngineEvent`]s.
///
/// The scheduling work itself is synchronous; this shell only reads the
/// inbox and sends replies back to the requesters.
pub struct Runtime {
    notifier: ChangeNotifier,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(notifier: ChangeNotifier, event_rx: mpsc::Receiver<EngineEvent>) -> Self {
        Self { notifier, event_rx }
    }

    /// Main event loop. Exits on shutdown or once every handle is dropped.
    pub async fn run(mut self) -> Result<()> {
        info!("cpmflow engine started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "engine received event");
            if !self.handle_event(event) {
                info!("shutdown requested; stopping engine");
                break;
            }
        }

        info!(
            observers = self.notifier.registry().len(),
            "engine exiting"
        );
        Ok(())
    }

    /// Handle one event. Returns `false` when the loop should stop.
    fn handle_event(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::TaskChanged { mutation, reply } => {
                let result = self.notifier.publish_mutation(&mutation);
                if let Err(ref err) = result {
                    warn!(task = mutation.task_id(), error = %err, "recompute failed; nothing published");
                }
                if reply.send(result).is_err() {
                    debug!("requester went away before the change was published");
                }
            }
            EngineEvent::Refresh { reply } => {
                let result = self.notifier.refresh();
                if let Err(ref err) = result {
                    warn!(error = %err, "refresh failed; nothing published");
                }
                if reply.send(result).is_err() {
                    debug!("requester went away before the refresh was published");
                }
            }
            EngineEvent::ObserverConnected { reply } => {
                let result = self.notifier.connect();
                if let Err(ref err) = result {
                    warn!(error = %err, "could not prepare initial events for observer");
                }
                if let Err(Ok(subscription)) = reply.send(result) {
                    // Nobody will read this subscription.
                    self.notifier.disconnect(subscription.id());
                }
            }
            EngineEvent::ObserverDisconnected { id } => {
                self.notifier.disconnect(id);
            }
            EngineEvent::ShutdownRequested => return false,
        }
        true
    }
}
