//! # Pool handler: one-shot, timeout-bounded batch supervision.
//!
//! [`PoolHandler`] runs an ordered batch of one-shot jobs over a fixed-size
//! worker pool on its own thread. Each job is a [`WorkerLauncher`]; its
//! result is the first payload message its worker emits. The pool places
//! exactly one message on the result channel per handler instance:
//!
//! - `Some(results)` when every job produced a result within the time
//!   budget, one result per input, input order preserved;
//! - `None` when the budget ran out or a job could not produce a result.
//!
//! Either way the pool is torn down cleanly: every spawned worker is
//! force-stopped before the thread exits, so no worker process outlives the
//! pool.

use std::collections::VecDeque;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::channels::{self, MessageReceiver};
use crate::signals::Message;
use crate::workers::{Worker, WorkerLauncher};

/// Sweep cadence for the pool scheduler loop.
const POOL_POLL: Duration = Duration::from_millis(10);

/// Pool sizing and time budget.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum number of workers running at once (min 1).
    pub pool_size: usize,
    /// Time budget for the whole batch.
    pub time_limit: Duration,
}

impl Default for PoolConfig {
    /// Defaults: `pool_size = 4`, `time_limit = 15s`.
    fn default() -> Self {
        Self {
            pool_size: 4,
            time_limit: Duration::from_secs(15),
        }
    }
}

/// Aggregate pool outcome: ordered results, or `None` on timeout/failure.
pub type PoolResult = Option<Vec<Value>>;

/// One-shot supervisor for a batch of jobs.
pub struct PoolHandler;

impl PoolHandler {
    /// Starts the pool on a dedicated thread.
    ///
    /// Exactly one [`PoolResult`] is sent on `results`; the thread then
    /// exits and the sender is dropped.
    pub fn spawn(
        jobs: Vec<Box<dyn WorkerLauncher>>,
        config: PoolConfig,
        results: flume::Sender<PoolResult>,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("prochost-pool".into())
            .spawn(move || {
                let outcome = run_pool(jobs, &config);
                let _ = results.send(outcome);
            })
    }
}

struct ActiveJob {
    index: usize,
    worker: Box<dyn Worker>,
    rx: MessageReceiver,
}

fn run_pool(jobs: Vec<Box<dyn WorkerLauncher>>, config: &PoolConfig) -> PoolResult {
    let deadline = Instant::now() + config.time_limit;
    let pool_size = config.pool_size.max(1);
    let total = jobs.len();

    let mut pending: VecDeque<(usize, Box<dyn WorkerLauncher>)> =
        jobs.into_iter().enumerate().collect();
    let mut slots: Vec<Option<Value>> = (0..total).map(|_| None).collect();
    let mut active: Vec<ActiveJob> = Vec::new();
    let mut failed = false;

    loop {
        // Top up the pool.
        while !failed && active.len() < pool_size {
            let Some((index, launcher)) = pending.pop_front() else {
                break;
            };
            let (tx, rx) = channels::pair();
            match launcher.launch(tx, None) {
                Ok(worker) => active.push(ActiveJob { index, worker, rx }),
                Err(err) => {
                    warn!(label = err.as_label(), error = %err, index, "pool job failed to launch");
                    failed = true;
                }
            }
        }

        // Sweep for results.
        let mut i = 0;
        while i < active.len() {
            match active[i].rx.try_recv() {
                Ok(Message::Payload(value)) => {
                    let mut job = active.swap_remove(i);
                    slots[job.index] = Some(value);
                    job.worker.force_stop();
                }
                Ok(Message::Signal(_)) => {
                    // Pool jobs carry no protocol role; signals are noise.
                    i += 1;
                }
                Err(flume::TryRecvError::Empty) => {
                    i += 1;
                }
                Err(flume::TryRecvError::Disconnected) => {
                    let mut job = active.swap_remove(i);
                    if slots[job.index].is_none() {
                        warn!(index = job.index, "pool job exited without a result");
                        failed = true;
                    }
                    job.worker.force_stop();
                }
            }
        }

        if slots.iter().all(Option::is_some) {
            for mut job in active {
                job.worker.force_stop();
            }
            debug!(total, "pool batch complete");
            return Some(slots.into_iter().flatten().collect());
        }

        if failed || Instant::now() >= deadline {
            for mut job in active {
                job.worker.force_stop();
            }
            debug!(total, failed, "pool batch abandoned");
            return None;
        }

        thread::sleep(POOL_POLL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::WorkerFn;

    fn job(i: u64) -> Box<dyn WorkerLauncher> {
        Box::new(WorkerFn::new("pool-job", move |outbound, _| {
            let _ = outbound.send(Message::payload(i * 10));
        }))
    }

    #[test]
    fn test_empty_batch_succeeds_immediately() {
        let (tx, rx) = flume::unbounded();
        let handle = PoolHandler::spawn(Vec::new(), PoolConfig::default(), tx).unwrap();
        assert_eq!(rx.recv().unwrap(), Some(Vec::new()));
        handle.join().unwrap();
    }

    #[test]
    fn test_order_preserved_with_small_pool() {
        let (tx, rx) = flume::unbounded();
        let jobs = (0..8).map(job).collect();
        let config = PoolConfig {
            pool_size: 2,
            time_limit: Duration::from_secs(5),
        };
        let handle = PoolHandler::spawn(jobs, config, tx).unwrap();
        let outcome = rx.recv().unwrap().expect("batch should complete");
        let expected: Vec<Value> = (0..8u64).map(|i| Value::from(i * 10)).collect();
        assert_eq!(outcome, expected);
        handle.join().unwrap();
    }
}
