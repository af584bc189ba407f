//! # Deferred-timer seam.
//!
//! The host needs exactly one scheduler primitive: "invoke this callback
//! once, after a delay". GUI event loops provide it natively (a deferred
//! timer); [`TokioTimer`] maps it onto a tokio runtime for non-GUI
//! embeddings. Nothing else in the crate touches the embedding runtime.

use std::time::Duration;

use tokio::runtime::Handle;

/// One-shot callback handed to a [`Timer`].
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Deferred one-shot execution.
///
/// Implementations must run `callback` once, roughly `delay` after the call,
/// on any thread. Dropping the scheduling source may drop pending callbacks;
/// the host tolerates missed callbacks (polling simply stops).
pub trait Timer: Send + Sync + 'static {
    /// Schedules `callback` to run once after `delay`.
    fn call_later(&self, delay: Duration, callback: TimerCallback);
}

/// Reference [`Timer`] backed by a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    /// Wraps an explicit runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the current runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime context, like
    /// [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Uses the current runtime, or `None` outside a runtime context.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Timer for TokioTimer {
    fn call_later(&self, delay: Duration, callback: TimerCallback) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
    }
}
