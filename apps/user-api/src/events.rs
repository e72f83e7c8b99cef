//! In-process consumer for user lifecycle events.
//!
//! The service emits best-effort events into a bounded channel; this
//! module drains it into the log. Anything heavier (a broker, webhooks)
//! would plug in here instead.

use domain_users::UserEvent;
use tokio::sync::mpsc;
use tracing::info;

/// Capacity of the lifecycle event channel. When the consumer falls this
/// far behind, emission starts racing request deadlines and events are
/// dropped.
pub const CHANNEL_CAPACITY: usize = 64;

/// Spawn the task that drains lifecycle events into the log.
pub fn spawn_logger(mut events: mpsc::Receiver<UserEvent>) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!(kind = event.kind(), user_id = event.user_id(), "user event");
        }
        tracing::debug!("event channel closed");
    });
}
