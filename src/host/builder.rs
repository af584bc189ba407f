//! # Host builder.
//!
//! Assembles a [`ProcessHost`] from its injected capabilities: the timer
//! seam, the drain policy, and the message hook.

use std::sync::Arc;

use crate::channels::{DeliverOne, DrainPolicy};
use crate::host::{HostConfig, MessageHook, ProcessHost, Timer};
use crate::signals::Message;

/// Builder for a [`ProcessHost`].
///
/// ## Example
/// ```no_run
/// use prochost::{DeliverLatest, HostConfig, ProcessHost, TokioTimer};
///
/// let host = ProcessHost::builder(HostConfig::default(), TokioTimer::current())
///     .with_drain(DeliverLatest)
///     .on_message(|msg| println!("got {msg:?}"))
///     .build();
/// ```
pub struct HostBuilder {
    cfg: HostConfig,
    timer: Arc<dyn Timer>,
    drain: Arc<dyn DrainPolicy>,
    hook: Option<MessageHook>,
}

impl HostBuilder {
    /// Creates a builder with the deliver-one policy and no message hook.
    pub fn new(cfg: HostConfig, timer: impl Timer) -> Self {
        Self {
            cfg,
            timer: Arc::new(timer),
            drain: Arc::new(DeliverOne),
            hook: None,
        }
    }

    /// Sets the drain policy (deliver-one by default).
    pub fn with_drain(mut self, drain: impl DrainPolicy) -> Self {
        self.drain = Arc::new(drain);
        self
    }

    /// Sets the message hook invoked once per delivered message.
    ///
    /// Without a hook, delivered messages are dropped.
    pub fn on_message<F>(mut self, hook: F) -> Self
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Builds the host.
    pub fn build(self) -> ProcessHost {
        let hook: MessageHook = self.hook.unwrap_or_else(|| Arc::new(|_| {}));
        ProcessHost::from_parts(self.cfg, self.timer, self.drain, hook)
    }
}
