// src/notify/mod.rs

//! Change propagation to observers.
//!
//! - [`events`] defines the tagged payloads and [`TaskMutation`].
//! - [`registry`] holds the live observer set and does the fan-out.
//! - [`notifier`] re-reads the store, recomputes the schedule and publishes.
//!
//! Observers are plain channel receivers; nothing here knows about
//! transports.

pub mod events;
pub mod notifier;
pub mod registry;

pub use events::{MAX_EVENT_BATCH, ScheduleEvent, TaskMutation};
pub use notifier::ChangeNotifier;
pub use registry::{BroadcastReport, ObserverId, ObserverRegistry, Subscription};
