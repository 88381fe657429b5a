//! Periodic background refresh.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Spawns refresh loops on the tokio runtime.
pub struct Poller;

impl Poller {
    /// Run `task` now and then every `period` until the handle is cancelled
    /// or dropped.
    ///
    /// A run that overruns the period delays the next one instead of
    /// triggering a burst.
    pub fn spawn<F, Fut>(period: Duration, mut task: F) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                task().await;
            }
        });

        debug!(?period, "Poller started");
        PollHandle { handle }
    }
}

/// Owner of a running poll loop. The loop stops when this is dropped.
#[derive(Debug)]
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the loop. Any in-flight run is abandoned.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
