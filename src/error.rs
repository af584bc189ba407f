//! Error types used by the host runtime and workers.
//!
//! This module defines two main error enums:
//!
//! - [`HostError`] — errors raised by the caller-facing supervision API.
//! - [`WorkerError`] — errors raised while spawning or talking to a worker.
//!
//! Both types provide an `as_label` helper returning a short stable label
//! for logs. Internal handler/worker faults never surface here: they degrade
//! to "session finished" and flow through normal cleanup. The only errors
//! visible to caller control flow are session misuse and a failed launch.

use thiserror::Error;

use crate::signals::Token;

/// # Errors produced by the caller-facing host API.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HostError {
    /// Two reserved signal tokens (or an allow-list entry) collide.
    ///
    /// Raised at [`SignalSet`](crate::SignalSet) construction time, never at
    /// runtime.
    #[error("signal tokens must be pairwise distinct (collision on {token})")]
    SignalCollision {
        /// The token that collided with an already-registered one.
        token: Token,
    },

    /// A handler session is already active for this host.
    ///
    /// Starting a second session while one is running is a programmer error
    /// and is surfaced immediately rather than queued.
    #[error("a handler session is already active")]
    SessionActive,

    /// The worker could not be launched.
    #[error("failed to launch worker: {0}")]
    Launch(#[from] WorkerError),
}

impl HostError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use prochost::HostError;
    ///
    /// assert_eq!(HostError::SessionActive.as_label(), "host_session_active");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HostError::SignalCollision { .. } => "host_signal_collision",
            HostError::SessionActive => "host_session_active",
            HostError::Launch(_) => "host_launch_failed",
        }
    }
}

/// # Errors produced while spawning or exchanging frames with a worker.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Spawning the worker process or thread failed.
    #[error("spawn failed: {0}")]
    Spawn(#[source] std::io::Error),

    /// Reading or writing a wire frame failed.
    #[error("frame i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A frame arrived that could not be decoded as a [`Message`](crate::Message).
    #[error("malformed frame: {0}")]
    Frame(#[source] serde_json::Error),
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Spawn(_) => "worker_spawn_failed",
            WorkerError::Io(_) => "worker_io_failed",
            WorkerError::Frame(_) => "worker_bad_frame",
        }
    }
}
