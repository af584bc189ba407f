//! Ticker demo: a thread-backed worker streams tick payloads upward while
//! the host polls from a tokio runtime.
//!
//! The worker answers the allow-listed `QUERY` command with a status payload
//! and acknowledges the kill handshake with *Done*.
//!
//! ```text
//! cargo run --example ticker
//! ```

use std::time::Duration;

use tracing::info;

use prochost::{
    HostConfig, Message, ProcessHost, SignalSet, Token, TokioTimer, WorkerFn, DONE, KILL,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), prochost::HostError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let signals =
        SignalSet::default().with_forward(["QUERY", "SOURCE"].map(Token::from))?;
    let cfg = HostConfig {
        signals,
        message_interval: Duration::from_millis(100),
        probe_interval: Duration::from_secs(2),
    };

    let host = ProcessHost::builder(cfg, TokioTimer::current())
        .on_message(|msg| match msg {
            Message::Signal(token) => info!(%token, "signal delivered"),
            Message::Payload(value) => info!(%value, "payload delivered"),
        })
        .build();

    host.start(&WorkerFn::new("ticker", |outbound, commands| {
        let Some(commands) = commands else { return };
        let mut ticks = 0u64;
        loop {
            match commands.recv_timeout(Duration::from_millis(250)) {
                Ok(msg) if msg.is_signal(&Token::from(KILL)) => {
                    let _ = outbound.send(Message::signal(DONE));
                    return;
                }
                Ok(msg) if msg.is_signal(&Token::from("QUERY")) => {
                    let _ = outbound.send(Message::payload(serde_json::json!({
                        "worker": "ticker",
                        "ticks": ticks,
                    })));
                }
                Ok(msg) if msg.is_signal(&Token::from("SOURCE")) => {
                    let _ = outbound.send(Message::payload("thread:ticker"));
                }
                Ok(_) => {}
                Err(flume::RecvTimeoutError::Timeout) => {
                    ticks += 1;
                    let _ = outbound.send(Message::payload(ticks));
                }
                Err(flume::RecvTimeoutError::Disconnected) => return,
            }
        }
    }))?;

    tokio::time::sleep(Duration::from_secs(1)).await;
    host.send_signal("QUERY");
    host.send_signal("SOURCE");
    tokio::time::sleep(Duration::from_secs(1)).await;

    info!("shutting down");
    // Blocks until the worker acknowledges; fine on a multi-thread runtime.
    host.kill();
    Ok(())
}
