//! # Single-worker handler: the core protocol loop.
//!
//! A [`SingleHandler`] owns exactly one worker for its lifetime and runs on
//! a dedicated thread. It blocks on the host→handler channel and classifies
//! each message:
//!
//! - terminal (*Kill* or *Done*): run the termination sequence, forward the
//!   same token once to the host, stop;
//! - liveness probe (*Check*): swallowed while the worker is alive; if the
//!   worker is gone, *Check* is forwarded and the loop stops, treating an
//!   unreachable worker as finished;
//! - allow-listed command: forwarded verbatim toward the worker;
//! - anything else: opaque payload, forwarded verbatim to the host.
//!
//! Worker-originated traffic never passes through this classification; the
//! worker (or its stdout pump) writes straight onto the handler→host
//! channel.
//!
//! ## Termination sequence
//! Runs exactly once per handler lifetime. With a command channel the worker
//! gets a *Kill* and the handler waits for the worker's own *Done* on the
//! handler→host channel; for a live worker this wait is unbounded by design
//! (the trust contract of the cooperative handshake). The wait also ends if
//! the worker is observed dead, which keeps a worker that already exited
//! from deadlocking teardown. Afterwards, command channel or not, a worker
//! still alive is stopped forcibly and reaped.
//!
//! The handler never lets a fault escalate to the host thread: a
//! disconnected inbound channel is treated as a terminal request and flows
//! through the same shutdown path.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::channels::{MessageReceiver, MessageSender};
use crate::signals::{Message, SignalSet};
use crate::workers::Worker;

/// How often the graceful wait re-checks worker liveness. Bounds only the
/// liveness re-check, never the overall wait.
const GRACE_POLL: Duration = Duration::from_millis(50);

pub(crate) struct SingleHandler {
    signals: Arc<SignalSet>,
    /// Host→handler queue (the worker pump also feeds nothing here; commands
    /// and probes only).
    inbound: MessageReceiver,
    /// Handler→host queue, shared with the worker's outbound side.
    outbound: MessageSender,
    /// Receiver clone of the handler→host queue, touched only during the
    /// graceful wait while the host is parked in its join.
    outbound_rx: MessageReceiver,
    /// Worker command queue, present iff an allow-list was configured.
    commands: Option<MessageSender>,
    worker: Box<dyn Worker>,
}

impl SingleHandler {
    /// Spawns the handler loop on a dedicated named thread.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn spawn(
        signals: Arc<SignalSet>,
        inbound: MessageReceiver,
        outbound: MessageSender,
        outbound_rx: MessageReceiver,
        commands: Option<MessageSender>,
        worker: Box<dyn Worker>,
    ) -> std::io::Result<JoinHandle<()>> {
        let handler = SingleHandler {
            signals,
            inbound,
            outbound,
            outbound_rx,
            commands,
            worker,
        };
        thread::Builder::new()
            .name("prochost-handler".into())
            .spawn(move || handler.run())
    }

    fn run(mut self) {
        debug!("handler loop started");
        loop {
            let msg = match self.inbound.recv() {
                Ok(msg) => msg,
                Err(_) => {
                    // Host dropped the session; same path as an explicit kill.
                    debug!("inbound channel closed; shutting worker down");
                    self.shutdown_worker();
                    return;
                }
            };
            if !self.dispatch(msg) {
                return;
            }
        }
    }

    /// Handles one inbound message. Returns `false` when the loop must stop.
    fn dispatch(&mut self, msg: Message) -> bool {
        let token = match msg.as_signal() {
            Some(token) => token.clone(),
            None => {
                // Opaque payload, handed to the host untouched.
                let _ = self.outbound.send(msg);
                return true;
            }
        };

        if self.signals.is_terminal(&token) {
            debug!(%token, "terminal signal received");
            self.shutdown_worker();
            let _ = self.outbound.send(Message::Signal(token));
            return false;
        }

        if self.signals.is_check(&token) {
            if self.worker.is_alive() {
                // Probe swallowed; the worker is fine.
                return true;
            }
            debug!("liveness probe found worker dead; reporting check upward");
            // The feeder thread blocks on the command channel until its only
            // sender is gone; drop it before force_stop joins the feeder.
            drop(self.commands.take());
            self.worker.force_stop();
            let _ = self.outbound.send(Message::Signal(token));
            return false;
        }

        if self.signals.is_forwardable(&token) {
            match &self.commands {
                Some(commands) => {
                    let _ = commands.send(Message::Signal(token));
                }
                None => warn!(%token, "allow-listed token with no command channel; dropping"),
            }
            return true;
        }

        // Unknown token: not a command, handed upward verbatim.
        let _ = self.outbound.send(Message::Signal(token));
        true
    }

    /// The termination sequence. Runs exactly once; `commands` is consumed.
    fn shutdown_worker(&mut self) {
        if let Some(commands) = self.commands.take() {
            let _ = commands.send(Message::Signal(self.signals.kill().clone()));
            drop(commands);
            self.await_worker_done();
        }
        self.worker.force_stop();
        debug!("worker shut down");
    }

    /// Waits for the worker's *Done* on the handler→host channel.
    ///
    /// Unbounded for a live worker. Messages consumed here are post-terminal
    /// and are discarded; the host is parked in its join and delivers only
    /// the final terminal token it drains after this handler exits.
    fn await_worker_done(&mut self) {
        loop {
            match self.outbound_rx.recv_timeout(GRACE_POLL) {
                Ok(msg) => {
                    if msg.is_signal(self.signals.done()) {
                        debug!("worker acknowledged kill");
                        return;
                    }
                }
                Err(flume::RecvTimeoutError::Timeout) => {
                    if !self.worker.is_alive() {
                        debug!("worker exited without done; ending graceful wait");
                        return;
                    }
                }
                Err(flume::RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}
