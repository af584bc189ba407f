//! # ProcessHost: caller-facing supervisor.
//!
//! Runs on the caller's cooperative scheduler thread. A host supervises at
//! most one handler session at a time; the single-session invariant is
//! enforced at [`start`](ProcessHost::start), not resolved as a race.
//!
//! ## Lifecycle
//! ```text
//! Idle ──start()──► Running ──kill() / terminal delivery──► Stopping ──► Idle
//!
//! while Running:
//!   check_message (every message_interval)
//!     ├─ drain per DrainPolicy (one message, or newest of many)
//!     ├─ reserved token? → stop polling, join handler, cleanup, deliver once
//!     └─ otherwise      → deliver to the message hook, reschedule
//!   check_running (every probe_interval)
//!     ├─ handler thread alive → send Check, reschedule
//!     └─ handler thread gone  → stop probing permanently
//! ```
//!
//! ## Blocking
//! The host never blocks the scheduler thread except inside
//! [`kill`](ProcessHost::kill), which joins the handler thread. That join is
//! the deliberate, documented blocking point of the whole design; with a
//! command channel it lasts as long as the worker takes to acknowledge the
//! kill.

use std::sync::{Arc, Weak};
use std::thread::JoinHandle;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::channels::{self, DrainPolicy, MessageReceiver, MessageSender};
use crate::error::HostError;
use crate::handler::single::SingleHandler;
use crate::host::{HostConfig, Timer};
use crate::signals::{Message, SignalSet, Token};
use crate::workers::WorkerLauncher;

/// Caller callback invoked once per delivered message.
///
/// Receives reserved tokens and opaque payloads alike; exactly one terminal
/// delivery (*Kill*, *Done*, or *Check*) arrives per session, after which no
/// further deliveries occur for that session.
pub type MessageHook = Arc<dyn Fn(Message) + Send + Sync>;

/// Host lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostState {
    /// No handler session.
    Idle,
    /// A handler session is active and polling is armed.
    Running,
    /// Teardown in progress (kill or terminal delivery).
    Stopping,
}

/// Caller-facing supervisor handle. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct ProcessHost {
    inner: Arc<HostInner>,
}

pub(crate) struct HostInner {
    cfg: HostConfig,
    signals: Arc<SignalSet>,
    timer: Arc<dyn Timer>,
    drain: Arc<dyn DrainPolicy>,
    hook: MessageHook,
    session: Mutex<Session>,
}

#[derive(Default)]
struct Session {
    state: SessionState,
    handler: Option<JoinHandle<()>>,
    to_handler: Option<MessageSender>,
    from_handler: Option<MessageReceiver>,
    /// A terminal token is already in flight; `kill()` must not re-send.
    terminal_sent: bool,
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    #[default]
    Idle,
    Running,
    Stopping,
}

impl ProcessHost {
    /// Starts building a host. See [`HostBuilder`](crate::HostBuilder).
    pub fn builder(cfg: HostConfig, timer: impl Timer) -> crate::HostBuilder {
        crate::HostBuilder::new(cfg, timer)
    }

    pub(crate) fn from_parts(
        cfg: HostConfig,
        timer: Arc<dyn Timer>,
        drain: Arc<dyn DrainPolicy>,
        hook: MessageHook,
    ) -> Self {
        let signals = Arc::new(cfg.signals.clone());
        Self {
            inner: Arc::new(HostInner {
                cfg,
                signals,
                timer,
                drain,
                hook,
                session: Mutex::new(Session::default()),
            }),
        }
    }

    /// Starts a handler session for one worker.
    ///
    /// Creates the channel pair (plus the worker command channel when the
    /// signal set carries an allow-list), launches the worker, spawns the
    /// handler thread, and arms both poll cycles.
    ///
    /// # Errors
    /// - [`HostError::SessionActive`] if a session is already running; this
    ///   is a programmer error, surfaced immediately.
    /// - [`HostError::Launch`] if the worker could not be spawned.
    pub fn start(&self, launcher: &dyn WorkerLauncher) -> Result<(), HostError> {
        let inner = &self.inner;
        let mut session = inner.session.lock();
        if session.state != SessionState::Idle {
            return Err(HostError::SessionActive);
        }

        let (to_handler_tx, to_handler_rx) = channels::pair();
        let (to_host_tx, to_host_rx) = channels::pair();
        let (commands_tx, commands_rx) = if inner.signals.has_forward() {
            let (tx, rx) = channels::pair();
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        let worker = launcher.launch(to_host_tx.clone(), commands_rx)?;
        let handle = SingleHandler::spawn(
            Arc::clone(&inner.signals),
            to_handler_rx,
            to_host_tx,
            to_host_rx.clone(),
            commands_tx,
            worker,
        )
        .map_err(|err| HostError::Launch(crate::WorkerError::Spawn(err)))?;

        session.state = SessionState::Running;
        session.handler = Some(handle);
        session.to_handler = Some(to_handler_tx);
        session.from_handler = Some(to_host_rx);
        session.terminal_sent = false;
        drop(session);

        debug!(drain = inner.drain.name(), "session started");
        schedule_message_poll(inner);
        schedule_probe(inner);
        Ok(())
    }

    /// Enqueues a signal token toward the handler.
    ///
    /// Legal at any time. Without an active session the token is simply
    /// never consumed; no error is raised.
    pub fn send_signal(&self, token: impl Into<Token>) {
        self.send(Message::Signal(token.into()));
    }

    /// Enqueues a message toward the handler.
    pub fn send(&self, msg: Message) {
        let mut session = self.inner.session.lock();
        if let Some(token) = msg.as_signal() {
            if self.inner.signals.is_terminal(token) {
                session.terminal_sent = true;
            }
        }
        if let Some(tx) = session.to_handler.as_ref() {
            let _ = tx.send(msg);
        }
    }

    /// Ends the current session, blocking until the handler thread is gone.
    ///
    /// Sends *Kill* unless a terminal signal is already in flight, joins the
    /// handler thread (the one deliberate blocking point of the host),
    /// drains both channels, delivers the final terminal token exactly once
    /// to the message hook, and returns to `Idle`. No-op on an idle host.
    pub fn kill(&self) {
        let inner = &self.inner;
        let (handle, to_handler, from_handler, need_signal) = {
            let mut session = inner.session.lock();
            match session.state {
                SessionState::Idle => return,
                // Another kill is mid-flight; it owns the teardown.
                SessionState::Stopping => return,
                SessionState::Running => {}
            }
            session.state = SessionState::Stopping;
            let need_signal = !session.terminal_sent;
            session.terminal_sent = true;
            (
                session.handler.take(),
                session.to_handler.take(),
                session.from_handler.take(),
                need_signal,
            )
        };

        if let Some(tx) = to_handler {
            if need_signal {
                let _ = tx.send(Message::Signal(inner.signals.kill().clone()));
            }
            drop(tx);
        }
        if let Some(handle) = handle {
            // Deliberate blocking point: unbounded while a command-channel
            // worker withholds its Done.
            if handle.join().is_err() {
                warn!("handler thread panicked during shutdown");
            }
        }

        let mut terminal = None;
        if let Some(rx) = from_handler {
            for msg in channels::drain(&rx) {
                let reserved = msg
                    .as_signal()
                    .is_some_and(|t| inner.signals.is_reserved(t));
                if reserved {
                    terminal = Some(msg);
                }
            }
        }

        inner.session.lock().state = SessionState::Idle;
        debug!("session ended by kill");
        if let Some(msg) = terminal {
            (inner.hook)(msg);
        }
    }

    /// True while a handler session is active.
    pub fn is_running(&self) -> bool {
        self.state() == HostState::Running
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HostState {
        match self.inner.session.lock().state {
            SessionState::Idle => HostState::Idle,
            SessionState::Running => HostState::Running,
            SessionState::Stopping => HostState::Stopping,
        }
    }
}

/// One message poll cycle. Runs from a timer callback.
fn check_message(inner: &Arc<HostInner>) {
    let msg = {
        let mut session = inner.session.lock();
        if session.state != SessionState::Running {
            return;
        }
        let Some(rx) = session.from_handler.as_ref() else {
            return;
        };
        let msg = inner.drain.take(rx);

        let terminal = msg
            .as_ref()
            .and_then(Message::as_signal)
            .is_some_and(|t| inner.signals.is_reserved(t));
        if terminal {
            // The handler initiated shutdown; clean up locally without
            // re-sending a kill, then stop polling.
            session.state = SessionState::Stopping;
            let handle = session.handler.take();
            let to_handler = session.to_handler.take();
            let from_handler = session.from_handler.take();
            drop(session);

            drop(to_handler);
            if let Some(handle) = handle {
                if handle.join().is_err() {
                    warn!("handler thread panicked during shutdown");
                }
            }
            if let Some(rx) = from_handler {
                let _ = channels::drain(&rx);
            }
            inner.session.lock().state = SessionState::Idle;
            debug!("session ended by terminal delivery");

            if let Some(msg) = msg {
                (inner.hook)(msg);
            }
            return;
        }
        msg
    };

    if let Some(msg) = msg {
        (inner.hook)(msg);
    }
    schedule_message_poll(inner);
}

/// One liveness probe cycle. Runs from a timer callback.
fn check_running(inner: &Arc<HostInner>) {
    {
        let session = inner.session.lock();
        if session.state != SessionState::Running {
            return;
        }
        let handler_alive = session
            .handler
            .as_ref()
            .is_some_and(|h| !h.is_finished());
        if !handler_alive {
            // Once the handler thread has exited, probing stops for good.
            debug!("handler thread exited; liveness probing stopped");
            return;
        }
        if let Some(tx) = session.to_handler.as_ref() {
            let _ = tx.send(Message::Signal(inner.signals.check().clone()));
        }
    }
    schedule_probe(inner);
}

fn schedule_message_poll(inner: &Arc<HostInner>) {
    let weak = Arc::downgrade(inner);
    inner.timer.call_later(
        inner.cfg.message_interval,
        Box::new(move || run_if_live(&weak, check_message)),
    );
}

fn schedule_probe(inner: &Arc<HostInner>) {
    let weak = Arc::downgrade(inner);
    inner.timer.call_later(
        inner.cfg.probe_interval,
        Box::new(move || run_if_live(&weak, check_running)),
    );
}

/// Dropping every host handle silently disarms all pending callbacks.
fn run_if_live(weak: &Weak<HostInner>, f: fn(&Arc<HostInner>)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}
