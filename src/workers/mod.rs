//! Worker seam: the unit of caller-supplied logic a handler supervises.
//!
//! The handler talks to its worker through two small traits:
//!
//! - [`WorkerLauncher`] creates a worker, handing it the outbound message
//!   channel and, when an allow-list is configured, the command channel;
//! - [`Worker`] is the supervising side's handle: liveness and forced stop.
//!
//! Two implementations ship with the crate:
//!
//! - [`ChildLauncher`] runs the worker as an isolated OS process speaking
//!   line-delimited JSON frames over piped stdio. A crash there cannot
//!   corrupt supervisor memory.
//! - [`WorkerFn`] runs a closure on a dedicated thread, receiving the same
//!   channel endpoints. Convenient for tests and for workloads that do not
//!   need process isolation; threads cannot be force-terminated.
//!
//! The worker-process side of the pipe protocol lives in [`harness`]: a
//! child binary builds a [`WorkerContext`] over its stdio and runs the
//! caller's entrypoint through [`run_worker`].

mod child;
mod frame;
mod harness;
mod thread_fn;
mod worker;

pub use child::{ChildLauncher, ChildWorker};
pub use harness::{run_worker, WorkerContext};
pub use thread_fn::{ThreadWorker, WorkerFn};
pub use worker::{Worker, WorkerLauncher};

pub(crate) use frame::{read_frame, write_frame};
