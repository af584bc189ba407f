//! # Worker-process harness.
//!
//! The child-binary side of the pipe protocol. A worker process builds a
//! [`WorkerContext`] over its stdio and then follows the entrypoint
//! contract: push payloads at will, poll commands non-blockingly, and on
//! observing *Kill* release resources and emit *Done* before exiting.
//!
//! [`run_worker`] wraps an entrypoint so the trailing *Done* is always sent,
//! on success and on error alike.
//!
//! ## Example (worker binary)
//! ```no_run
//! use prochost::{run_worker, SignalSet};
//!
//! fn main() {
//!     let signals = SignalSet::default();
//!     run_worker(signals, true, |ctx| {
//!         loop {
//!             if let Some(token) = ctx.poll_command() {
//!                 if ctx.is_kill(&token) {
//!                     break;
//!                 }
//!                 // react to allow-listed commands here
//!             }
//!             ctx.send(serde_json::json!({"tick": 1}))?;
//!             std::thread::sleep(std::time::Duration::from_millis(100));
//!         }
//!         Ok(())
//!     })
//!     .expect("worker failed");
//! }
//! ```

use std::io::{self, Write};
use std::thread;

use tracing::debug;

use crate::channels::{pair, MessageReceiver};
use crate::error::WorkerError;
use crate::signals::{Message, SignalSet, Token};
use crate::workers::{read_frame, write_frame};

/// Worker-side view of the session channels, bound to the process stdio.
pub struct WorkerContext {
    signals: SignalSet,
    commands: Option<MessageReceiver>,
}

impl WorkerContext {
    /// Builds a context over the current process's stdio.
    ///
    /// With `with_commands` a reader thread starts pumping stdin frames into
    /// an internal queue for [`poll_command`](Self::poll_command); pass the
    /// same value the host used when deciding on an allow-list.
    pub fn from_stdio(signals: SignalSet, with_commands: bool) -> Self {
        let commands = with_commands.then(|| {
            let (tx, rx) = pair();
            thread::spawn(move || {
                let stdin = io::stdin();
                let mut lock = stdin.lock();
                while let Ok(Some(msg)) = read_frame(&mut lock) {
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            });
            rx
        });
        Self { signals, commands }
    }

    /// Pushes an opaque payload onto the result stream.
    pub fn send(&self, value: impl Into<serde_json::Value>) -> Result<(), WorkerError> {
        self.send_message(&Message::Payload(value.into()))
    }

    /// Pushes a raw message onto the result stream.
    pub fn send_message(&self, msg: &Message) -> Result<(), WorkerError> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write_frame(&mut lock, msg)?;
        lock.flush()?;
        Ok(())
    }

    /// Non-blocking check of the command channel.
    ///
    /// Returns the next command token if one is pending. Payload frames on
    /// the command channel are ignored; commands are always signals.
    pub fn poll_command(&self) -> Option<Token> {
        let rx = self.commands.as_ref()?;
        while let Ok(msg) = rx.try_recv() {
            if let Some(token) = msg.as_signal() {
                return Some(token.clone());
            }
        }
        None
    }

    /// True if `token` asks this worker to shut down.
    pub fn is_kill(&self, token: &Token) -> bool {
        token == self.signals.kill()
    }

    /// The signal vocabulary this worker was configured with.
    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }
}

/// Runs a worker entrypoint over stdio and always emits *Done* on exit.
///
/// The trailing *Done* is the worker's half of the graceful-termination
/// handshake; emitting it unconditionally keeps a crashing entrypoint from
/// hanging a supervisor that is waiting on the cooperative path.
pub fn run_worker<F>(signals: SignalSet, with_commands: bool, entrypoint: F) -> Result<(), WorkerError>
where
    F: FnOnce(&WorkerContext) -> Result<(), WorkerError>,
{
    let ctx = WorkerContext::from_stdio(signals, with_commands);
    let result = entrypoint(&ctx);
    let done = Message::Signal(ctx.signals.done().clone());
    ctx.send_message(&done)?;
    debug!("worker entrypoint finished; done emitted");
    result
}
