//! Cancellable delayed callbacks.

use std::sync::Arc;
use std::time::Duration;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Cancels a callback scheduled with [`Scheduler::schedule`].
///
/// Dropping the handle leaves the callback scheduled.
pub struct CancelHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl CancelHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Runs a callback once after a delay.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> CancelHandle;
}

/// [`Scheduler`] backed by a tokio task per callback. Must be used from
/// within a runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> CancelHandle {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        CancelHandle::new(move || handle.abort())
    }
}

/// Runs only the last of a burst of calls, `delay` after the burst ends.
///
/// Every call cancels the pending one and restarts the timer. Dropping the
/// debouncer cancels whatever is still pending.
pub struct Debouncer {
    scheduler: Arc<dyn Scheduler>,
    delay: Duration,
    pending: Option<CancelHandle>,
}

impl Debouncer {
    pub fn new(scheduler: Arc<dyn Scheduler>, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn call(&mut self, task: impl FnOnce() + Send + 'static) {
        self.cancel();
        self.pending = Some(self.scheduler.schedule(self.delay, Box::new(task)));
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
