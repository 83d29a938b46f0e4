use std::time::Duration;

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

use crate::status::StatusSynchronizer;

/// Periodic status refresh. The first poll runs immediately.
///
/// Every tick launches its own poll, so a slow device never delays the
/// schedule and responses may land out of order. Dropping the task stops it.
pub struct PollTask {
    handle: JoinHandle<()>,
}

impl PollTask {
    pub fn spawn(status: StatusSynchronizer, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let status = status.clone();
                tokio::spawn(async move {
                    status.poll().await;
                });
            }
        });
        debug!("status polling every {}ms", every.as_millis());
        Self { handle }
    }

    /// Cancels future ticks. A poll already in flight still applies.
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
