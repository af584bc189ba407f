//! # Process-backed worker.
//!
//! [`ChildLauncher`] spawns the worker as a separate OS process with piped
//! stdio. No memory is shared with the supervisor; the only crossings are
//! the two frame streams:
//!
//! - child stdout → pump thread → outbound (handler→host) channel;
//! - command channel → feeder thread → child stdin (only with an allow-list).
//!
//! The pump forwards worker frames verbatim. Worker-originated traffic is
//! never classified as commands; it lands on the handler→host channel
//! exactly as sent.

use std::ffi::OsString;
use std::io::BufReader;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::channels::{MessageReceiver, MessageSender};
use crate::error::WorkerError;
use crate::workers::{read_frame, write_frame, Worker, WorkerLauncher};

/// Launches a worker as an isolated child process.
///
/// The program is expected to speak the frame protocol on its stdio, most
/// easily via [`run_worker`](crate::run_worker) in a companion binary.
#[derive(Clone, Debug)]
pub struct ChildLauncher {
    program: OsString,
    args: Vec<OsString>,
}

impl ChildLauncher {
    /// Creates a launcher for the given program.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl WorkerLauncher for ChildLauncher {
    fn launch(
        &self,
        outbound: MessageSender,
        commands: Option<MessageReceiver>,
    ) -> Result<Box<dyn Worker>, WorkerError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(if commands.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = cmd.spawn().map_err(WorkerError::Spawn)?;
        debug!(pid = child.id(), program = ?self.program, "worker process spawned");

        let stdout = child.stdout.take().ok_or_else(|| {
            WorkerError::Spawn(std::io::Error::new(
                std::io::ErrorKind::Other,
                "child stdout not captured",
            ))
        })?;
        let pump = thread::Builder::new()
            .name("prochost-pump".into())
            .spawn(move || pump_outbound(stdout, outbound))
            .map_err(WorkerError::Spawn)?;

        let feeder = match commands {
            Some(rx) => {
                let stdin = child.stdin.take().ok_or_else(|| {
                    WorkerError::Spawn(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "child stdin not captured",
                    ))
                })?;
                Some(
                    thread::Builder::new()
                        .name("prochost-feeder".into())
                        .spawn(move || feed_commands(rx, stdin))
                        .map_err(WorkerError::Spawn)?,
                )
            }
            None => None,
        };

        Ok(Box::new(ChildWorker {
            child,
            pump: Some(pump),
            feeder,
        }))
    }
}

/// Supervising-side handle to a spawned child process.
pub struct ChildWorker {
    child: Child,
    pump: Option<JoinHandle<()>>,
    feeder: Option<JoinHandle<()>>,
}

impl Worker for ChildWorker {
    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn force_stop(&mut self) {
        if self.is_alive() {
            if let Err(err) = self.child.kill() {
                warn!(error = %err, "failed to terminate worker process");
            }
        }
        match self.child.wait() {
            Ok(status) => debug!(pid = self.child.id(), %status, "worker process reaped"),
            Err(err) => warn!(error = %err, "failed to reap worker process"),
        }
        // Pump sees EOF once the child is gone; feeder exits when the
        // command sender is dropped (the handler drops it before stopping).
        if let Some(pump) = self.pump.take() {
            let _ = pump.join();
        }
        if let Some(feeder) = self.feeder.take() {
            let _ = feeder.join();
        }
    }
}

/// Forwards decoded child stdout frames onto the handler→host channel.
fn pump_outbound(stdout: ChildStdout, outbound: MessageSender) {
    let mut reader = BufReader::new(stdout);
    loop {
        match read_frame(&mut reader) {
            Ok(Some(msg)) => {
                if outbound.send(msg).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!(label = err.as_label(), error = %err, "dropping undecodable worker frame");
                break;
            }
        }
    }
}

/// Encodes command-channel messages onto child stdin.
fn feed_commands(rx: MessageReceiver, mut stdin: ChildStdin) {
    while let Ok(msg) = rx.recv() {
        if let Err(err) = write_frame(&mut stdin, &msg) {
            debug!(error = %err, "worker stdin closed; stopping command feed");
            break;
        }
    }
}
