//! # prochost
//!
//! **Prochost** supervises an isolated worker process from a caller that
//! lives inside a cooperative, single-threaded scheduler (a GUI event loop,
//! a current-thread async runtime). It is a small building block, not a task
//! scheduler: one active worker (or one one-shot worker pool) per host.
//!
//! ## Architecture
//! Three parties, three execution contexts:
//! ```text
//!  caller scheduler thread          dedicated thread           OS process
//! ┌───────────────────────┐      ┌──────────────────┐      ┌──────────────┐
//! │ ProcessHost           │      │ SingleHandler    │      │ Worker       │
//! │  - start/kill         │ ───► │  protocol loop   │ ───► │  entrypoint  │
//! │  - send_signal        │ cmds │  classification  │ Kill │  (pipes or   │
//! │  - scheduled polls    │ ◄─── │  termination seq │ ◄─── │   closure)   │
//! └───────────────────────┘ msgs └──────────────────┘ Done └──────────────┘
//! ```
//!
//! - The **host** never blocks its scheduler thread, except inside
//!   [`ProcessHost::kill`] (the single documented blocking point). Polling
//!   is re-armed through the [`Timer`] seam, the only coupling to the
//!   embedding event loop.
//! - The **handler** owns exactly one worker for its lifetime and blocks
//!   only on its inbound channel and on the graceful-kill handshake.
//! - The **worker** runs caller logic in an isolated process
//!   ([`ChildLauncher`]) or, when isolation is not needed, on a thread
//!   ([`WorkerFn`]). It pushes opaque payloads upward at any time and is
//!   expected to answer *Kill* with *Done*.
//!
//! Everything on a channel is a [`Message`]: a tagged `Signal(Token)` or
//! `Payload(Value)`, so payload data can never collide with the protocol
//! vocabulary. The reserved tokens (*Kill* = `"CLOSE"`, *Done* = `"DONE"`,
//! *Check* = `"CHECK"`) live in a [`SignalSet`] validated at construction.
//!
//! ## Delivery policies
//! The host drains its inbound queue through a pluggable [`DrainPolicy`]:
//! [`DeliverOne`] hands over at most one message per poll cycle;
//! [`DeliverLatest`] keeps only the freshest pending message and discards
//! the rest.
//!
//! ## Pool
//! [`PoolHandler`] is the secondary supervisor: a fixed-size, one-shot
//! worker pool mapping a batch of jobs with a time budget, delivering
//! exactly one ordered result list, or one `None` sentinel on timeout.
//!
//! ## Example
//! ```no_run
//! use prochost::{HostConfig, Message, ProcessHost, TokioTimer, WorkerFn};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), prochost::HostError> {
//!     let host = ProcessHost::builder(HostConfig::default(), TokioTimer::current())
//!         .on_message(|msg| println!("delivered: {msg:?}"))
//!         .build();
//!
//!     host.start(&WorkerFn::new("ticker", |outbound, _| {
//!         for i in 0..5 {
//!             let _ = outbound.send(Message::payload(i));
//!             std::thread::sleep(std::time::Duration::from_millis(200));
//!         }
//!         let _ = outbound.send(Message::signal("DONE"));
//!     }))?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(2)).await;
//!     host.kill();
//!     Ok(())
//! }
//! ```

mod channels;
mod error;
mod handler;
mod host;
mod signals;
mod workers;

// ---- Public re-exports ----

pub use channels::{drain, pair, DeliverLatest, DeliverOne, DrainPolicy, MessageReceiver, MessageSender};
pub use error::{HostError, WorkerError};
pub use handler::{PoolConfig, PoolHandler, PoolResult};
pub use host::{
    HostBuilder, HostConfig, HostState, MessageHook, ProcessHost, Timer, TimerCallback, TokioTimer,
};
pub use signals::{Message, SignalSet, Token, CHECK, DONE, KILL};
pub use workers::{
    run_worker, ChildLauncher, ChildWorker, ThreadWorker, Worker, WorkerContext, WorkerFn,
    WorkerLauncher,
};
