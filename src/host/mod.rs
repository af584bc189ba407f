//! Host: the caller-facing supervisor.
//!
//! Lives on the caller's cooperative scheduler thread and never blocks there
//! except during the single, deliberate [`ProcessHost::kill`] join. Polling
//! is re-armed through the [`Timer`] seam, the sole coupling to the
//! embedding event loop.

mod builder;
mod config;
#[allow(clippy::module_inception)]
mod host;
mod timer;

pub use builder::HostBuilder;
pub use config::HostConfig;
pub use host::{HostState, MessageHook, ProcessHost};
pub use timer::{Timer, TimerCallback, TokioTimer};
