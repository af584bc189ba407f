//! # Host configuration.
//!
//! [`HostConfig`] centralizes the per-host settings: the signal vocabulary
//! and the two polling cadences. Both cadences only bound how often the
//! scheduler wakes the host; they never make the host block.

use std::time::Duration;

use crate::signals::SignalSet;

/// Configuration for a [`ProcessHost`](crate::ProcessHost).
///
/// ## Field semantics
/// - `signals`: the immutable signal vocabulary shared with the handler;
///   a non-empty allow-list causes a worker command channel per session.
/// - `message_interval`: cadence of the message poll (`check_message`).
/// - `probe_interval`: cadence of the liveness probe (`check_running`),
///   usually much coarser than the message poll.
#[derive(Clone, Debug)]
pub struct HostConfig {
    /// Signal vocabulary shared between host, handler, and worker.
    pub signals: SignalSet,
    /// Delay between message poll cycles.
    pub message_interval: Duration,
    /// Delay between liveness probes.
    pub probe_interval: Duration,
}

impl Default for HostConfig {
    /// Defaults: default [`SignalSet`], 1s message poll, 10s liveness probe.
    fn default() -> Self {
        Self {
            signals: SignalSet::default(),
            message_interval: Duration::from_secs(1),
            probe_interval: Duration::from_secs(10),
        }
    }
}
