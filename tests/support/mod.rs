//! Shared fixtures for the integration tests.
//!
//! Polling is driven deterministically through [`ManualTimer`], a test
//! double for the host's deferred-timer seam: scheduled callbacks queue up
//! and the test fires them by cadence instead of waiting on wall clock.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use prochost::{HostConfig, Message, SignalSet, Timer, TimerCallback};

/// Message-poll cadence used as the queue key for `check_message` callbacks.
pub const MSG: Duration = Duration::from_millis(10);
/// Probe cadence used as the queue key for `check_running` callbacks.
pub const PROBE: Duration = Duration::from_millis(1000);

/// Deferred-timer test double. Callbacks run only when fired explicitly.
#[derive(Clone, Default)]
pub struct ManualTimer {
    queue: Arc<Mutex<Vec<(Duration, TimerCallback)>>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the oldest pending callback scheduled with `delay`.
    ///
    /// Returns false when none is pending. The callback runs outside the
    /// queue lock so it may schedule again.
    pub fn fire(&self, delay: Duration) -> bool {
        let callback = {
            let mut queue = self.queue.lock().unwrap();
            match queue.iter().position(|(d, _)| *d == delay) {
                Some(i) => queue.remove(i).1,
                None => return false,
            }
        };
        callback();
        true
    }

    /// Number of callbacks pending for `delay`.
    pub fn pending(&self, delay: Duration) -> usize {
        self.queue
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, _)| *d == delay)
            .count()
    }
}

impl Timer for ManualTimer {
    fn call_later(&self, delay: Duration, callback: TimerCallback) {
        self.queue.lock().unwrap().push((delay, callback));
    }
}

/// Collects everything the host delivers to its message hook.
#[derive(Clone, Default)]
pub struct Recorder {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, msg: Message) {
        self.messages.lock().unwrap().push(msg);
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

/// Host config with fast test cadences and the given signal set.
pub fn test_config(signals: SignalSet) -> HostConfig {
    HostConfig {
        signals,
        message_interval: MSG,
        probe_interval: PROBE,
    }
}

/// Fires message polls until `done()` holds or `max` wall time elapses.
pub fn drive_until(timer: &ManualTimer, max: Duration, done: impl Fn() -> bool) {
    let deadline = std::time::Instant::now() + max;
    while !done() {
        timer.fire(MSG);
        if std::time::Instant::now() >= deadline {
            panic!("condition not reached within {max:?}");
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}
