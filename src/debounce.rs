//! Trailing-edge debounce on top of tokio timers.

use futures::future::BoxFuture;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiet period before a debounced call fires.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(300);

type Action<A> = Box<dyn Fn(A) -> BoxFuture<'static, ()> + Send + Sync>;

/// Coalesces bursts of calls into one.
///
/// Every [`call`](Debouncer::call) aborts whatever is still pending and
/// schedules the action again `wait` later, so only the last call of a
/// burst runs, with that call's arguments. The scheduled task also runs the
/// action itself: aborting it cancels an action that is already in flight.
pub struct Debouncer<A> {
    action: Action<A>,
    wait: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(wait: Duration, action: F) -> Self
    where
        F: Fn(A) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        Self {
            action: Box::new(action),
            wait,
            pending: None,
        }
    }

    /// Schedule the action with `args`, replacing any pending call.
    /// Must be called from within a tokio runtime.
    pub fn call(&mut self, args: A) {
        self.cancel();
        let fut = (self.action)(args);
        let wait = self.wait;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            fut.await;
        }));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a call is scheduled or still running.
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
