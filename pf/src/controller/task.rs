//! Scoped background tasks
//!
//! A `ScopedTask` aborts its tokio task when dropped. Whoever owns the handle
//! owns the timer: clearing the field that holds it cancels the work.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Handle to a task that is aborted on drop
#[derive(Debug)]
pub struct ScopedTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ScopedTask {
    /// Spawn `future` on the current tokio runtime
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!(%name, "ScopedTask::spawn: called");
        Self {
            name,
            handle: tokio::spawn(future),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(name = self.name, "ScopedTask::drop: aborting pending task");
        }
        self.handle.abort();
    }
}

/// Send `event` once after `delay`
pub fn after<E>(name: &'static str, delay: Duration, tx: mpsc::UnboundedSender<E>, event: E) -> ScopedTask
where
    E: Send + 'static,
{
    debug!(%name, ?delay, "after: called");
    ScopedTask::spawn(name, async move {
        tokio::time::sleep(delay).await;
        if tx.send(event).is_err() {
            debug!(%name, "after: receiver dropped");
        }
    })
}

/// Send `make()` every `period`, starting one period from now
///
/// Runs until the receiver is dropped or the task is aborted.
pub fn every<E, F>(name: &'static str, period: Duration, tx: mpsc::UnboundedSender<E>, make: F) -> ScopedTask
where
    E: Send + 'static,
    F: Fn() -> E + Send + 'static,
{
    debug!(%name, ?period, "every: called");
    ScopedTask::spawn(name, async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            trace!(%name, "every: tick");
            if tx.send(make()).is_err() {
                debug!(%name, "every: receiver dropped, stopping");
                break;
            }
        }
    })
}
