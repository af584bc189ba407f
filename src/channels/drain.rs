//! # Drain policies for the host's message poll.
//!
//! The host drains its inbound queue once per poll cycle through a
//! [`DrainPolicy`], a capability composed into the host at construction:
//!
//! - [`DeliverOne`] takes at most one message per cycle, preserving every
//!   message across cycles;
//! - [`DeliverLatest`] (the greedy policy) drains everything pending and
//!   keeps only the newest message, trading delivery of intermediates for
//!   freshness. Discarded messages leave no trace.

use crate::channels::MessageReceiver;
use crate::signals::Message;

/// Strategy deciding how many pending messages one poll cycle consumes.
pub trait DrainPolicy: Send + Sync + 'static {
    /// Takes the message(s) this cycle should deliver, non-blocking.
    ///
    /// Returns `None` when nothing is pending.
    fn take(&self, rx: &MessageReceiver) -> Option<Message>;

    /// Short policy name for logs.
    fn name(&self) -> &'static str;
}

/// Deliver-one policy: at most one message per poll cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeliverOne;

impl DrainPolicy for DeliverOne {
    fn take(&self, rx: &MessageReceiver) -> Option<Message> {
        rx.try_recv().ok()
    }

    fn name(&self) -> &'static str {
        "deliver_one"
    }
}

/// Deliver-latest (greedy) policy: drain everything, keep the newest.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeliverLatest;

impl DrainPolicy for DeliverLatest {
    fn take(&self, rx: &MessageReceiver) -> Option<Message> {
        let mut latest = None;
        while let Ok(msg) = rx.try_recv() {
            latest = Some(msg);
        }
        latest
    }

    fn name(&self) -> &'static str {
        "deliver_latest"
    }
}
