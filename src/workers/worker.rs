//! # Worker traits.
//!
//! The seam between a handler and whatever executes the caller's logic.

use crate::channels::{MessageReceiver, MessageSender};
use crate::error::WorkerError;

/// Supervising-side handle to a running worker.
///
/// Implementations are owned by exactly one handler for their whole
/// lifetime; ownership never transfers.
pub trait Worker: Send + 'static {
    /// True while the worker is still running.
    fn is_alive(&mut self) -> bool;

    /// Stops the worker unconditionally and reclaims its resources.
    ///
    /// Terminates the worker if it is still alive, then reaps it and joins
    /// any plumbing threads. Must be safe to call on an already-finished
    /// worker, and more than once.
    fn force_stop(&mut self);
}

/// Creates workers bound to a session's channels.
///
/// `outbound` is the handler→host channel the worker pushes results onto.
/// `commands` is `Some` exactly when the session's signal set carries an
/// allow-list; the worker is expected to poll it non-blockingly and, on
/// observing *Kill*, release its resources and push *Done* onto `outbound`
/// before exiting.
pub trait WorkerLauncher: Send + 'static {
    /// Spawns one worker.
    fn launch(
        &self,
        outbound: MessageSender,
        commands: Option<MessageReceiver>,
    ) -> Result<Box<dyn Worker>, WorkerError>;
}
