//! # Function-backed worker (`WorkerFn`)
//!
//! [`WorkerFn`] wraps a closure and runs it on a dedicated thread with the
//! same channel endpoints an isolated process would get: the outbound
//! (handler→host) sender, plus the command receiver when an allow-list is
//! configured. Caller arguments are captured by the closure instead of being
//! passed positionally.
//!
//! A thread cannot be terminated from outside. `force_stop` reaps a finished
//! worker and detaches a live one; cooperative shutdown through the command
//! channel is the only reliable way to stop a `WorkerFn` early.
//!
//! ## Example
//! ```
//! use prochost::{Message, WorkerFn};
//!
//! let worker = WorkerFn::new("counter", |outbound, commands| {
//!     for i in 0..3 {
//!         if let Some(rx) = &commands {
//!             if rx.try_recv().is_ok() {
//!                 break;
//!             }
//!         }
//!         let _ = outbound.send(Message::payload(i));
//!     }
//!     let _ = outbound.send(Message::signal("DONE"));
//! });
//! assert_eq!(worker.name(), "counter");
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::channels::{MessageReceiver, MessageSender};
use crate::error::WorkerError;
use crate::workers::{Worker, WorkerLauncher};

/// Closure-backed worker launcher.
///
/// The closure runs once per launch on a fresh thread. Shared state between
/// launches must be made explicit with `Arc` inside the closure.
pub struct WorkerFn<F> {
    name: Cow<'static, str>,
    f: Arc<F>,
}

impl<F> WorkerFn<F>
where
    F: Fn(MessageSender, Option<MessageReceiver>) + Send + Sync + 'static,
{
    /// Creates a new function-backed worker launcher.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Returns the worker name (used for the thread name).
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F> WorkerLauncher for WorkerFn<F>
where
    F: Fn(MessageSender, Option<MessageReceiver>) + Send + Sync + 'static,
{
    fn launch(
        &self,
        outbound: MessageSender,
        commands: Option<MessageReceiver>,
    ) -> Result<Box<dyn Worker>, WorkerError> {
        let f = Arc::clone(&self.f);
        let handle = thread::Builder::new()
            .name(format!("prochost-worker-{}", self.name))
            .spawn(move || f(outbound, commands))
            .map_err(WorkerError::Spawn)?;
        Ok(Box::new(ThreadWorker {
            handle: Some(handle),
        }))
    }
}

/// Supervising-side handle to a thread-backed worker.
pub struct ThreadWorker {
    handle: Option<JoinHandle<()>>,
}

impl Worker for ThreadWorker {
    fn is_alive(&mut self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn force_stop(&mut self) {
        match self.handle.take() {
            Some(handle) if handle.is_finished() => {
                let _ = handle.join();
            }
            Some(handle) => {
                // Threads cannot be killed; leave it to finish on its own.
                warn!(
                    thread = handle.thread().name().unwrap_or("worker"),
                    "detaching live worker thread; it cannot be force-terminated"
                );
            }
            None => {}
        }
    }
}
