//! Integration tests for the one-shot worker pool.
//!
//! Jobs here are thread-backed ([`WorkerFn`]) so completion order, pool
//! sizing, and the timeout sentinel can be exercised without child
//! processes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use prochost::{
    Message, MessageReceiver, MessageSender, PoolConfig, PoolHandler, Worker, WorkerError,
    WorkerFn, WorkerLauncher,
};

fn config(pool_size: usize, time_limit: Duration) -> PoolConfig {
    PoolConfig {
        pool_size,
        time_limit,
    }
}

/// A job whose result is its input, delayed by `delay`.
fn delayed_job(value: u64, delay: Duration) -> Box<dyn WorkerLauncher> {
    Box::new(WorkerFn::new("delayed", move |outbound, _| {
        std::thread::sleep(delay);
        let _ = outbound.send(Message::payload(value));
    }))
}

#[test]
fn results_keep_input_order_despite_completion_order() {
    // Earlier inputs sleep longer, so completion order is reversed.
    let jobs: Vec<Box<dyn WorkerLauncher>> = (0..4u64)
        .map(|i| delayed_job(i, Duration::from_millis(40 * (4 - i))))
        .collect();

    let (tx, rx) = flume::unbounded();
    let handle = PoolHandler::spawn(jobs, config(4, Duration::from_secs(5)), tx).unwrap();

    let outcome = rx.recv().unwrap().expect("batch should complete");
    assert_eq!(outcome, (0..4u64).map(Value::from).collect::<Vec<_>>());
    handle.join().unwrap();
}

#[test]
fn pool_size_caps_concurrency() {
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let jobs: Vec<Box<dyn WorkerLauncher>> = (0..6u64)
        .map(|i| {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            Box::new(WorkerFn::new("counted", move |outbound, _| {
                let running = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(running, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(50));
                current.fetch_sub(1, Ordering::SeqCst);
                let _ = outbound.send(Message::payload(i));
            })) as Box<dyn WorkerLauncher>
        })
        .collect();

    let (tx, rx) = flume::unbounded();
    let handle = PoolHandler::spawn(jobs, config(2, Duration::from_secs(5)), tx).unwrap();

    let outcome = rx.recv().unwrap().expect("batch should complete");
    assert_eq!(outcome.len(), 6);
    assert!(peak.load(Ordering::SeqCst) <= 2, "pool ran more jobs than pool_size");
    handle.join().unwrap();
}

#[test]
fn timeout_delivers_the_none_sentinel() {
    // One job never produces a result; the budget expires.
    let jobs: Vec<Box<dyn WorkerLauncher>> = vec![
        delayed_job(1, Duration::from_millis(10)),
        Box::new(WorkerFn::new("silent", |_outbound, _| {
            std::thread::sleep(Duration::from_secs(10));
        })),
    ];

    let (tx, rx) = flume::unbounded();
    let handle = PoolHandler::spawn(jobs, config(2, Duration::from_millis(200)), tx).unwrap();

    assert_eq!(rx.recv().unwrap(), None);
    handle.join().unwrap();
}

#[test]
fn job_exiting_without_result_fails_the_batch() {
    let jobs: Vec<Box<dyn WorkerLauncher>> = vec![
        delayed_job(1, Duration::from_millis(10)),
        Box::new(WorkerFn::new("dropout", |_outbound, _| {})),
    ];

    let (tx, rx) = flume::unbounded();
    let handle = PoolHandler::spawn(jobs, config(2, Duration::from_secs(5)), tx).unwrap();

    assert_eq!(rx.recv().unwrap(), None);
    handle.join().unwrap();
}

#[test]
fn launch_failure_fails_the_batch() {
    struct Unlaunchable;

    impl WorkerLauncher for Unlaunchable {
        fn launch(
            &self,
            _outbound: MessageSender,
            _commands: Option<MessageReceiver>,
        ) -> Result<Box<dyn Worker>, WorkerError> {
            Err(WorkerError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such worker",
            )))
        }
    }

    let jobs: Vec<Box<dyn WorkerLauncher>> = vec![
        delayed_job(1, Duration::from_millis(10)),
        Box::new(Unlaunchable),
    ];

    let (tx, rx) = flume::unbounded();
    let handle = PoolHandler::spawn(jobs, config(2, Duration::from_secs(5)), tx).unwrap();

    assert_eq!(rx.recv().unwrap(), None);
    handle.join().unwrap();
}

#[test]
fn exactly_one_result_message_per_pool() {
    let jobs: Vec<Box<dyn WorkerLauncher>> = vec![delayed_job(7, Duration::from_millis(10))];

    let (tx, rx) = flume::unbounded();
    let handle = PoolHandler::spawn(jobs, config(1, Duration::from_secs(5)), tx).unwrap();

    assert_eq!(rx.recv().unwrap(), Some(vec![Value::from(7u64)]));
    handle.join().unwrap();

    // The thread dropped its sender after the single delivery.
    assert!(matches!(rx.recv(), Err(flume::RecvError::Disconnected)));
}
