//! Channel primitives connecting host, handler, and worker.
//!
//! A session is wired with two independent unbounded FIFO queues (the channel
//! pair: host→handler and handler→host) plus an optional third command queue
//! toward the worker. The handler side blocks on `recv`; the host side only
//! ever uses non-blocking `try_recv` from its poll callbacks.
//!
//! Receivers are cloneable: the handler keeps a clone of the handler→host
//! receiver that it touches only during the graceful-kill wait, while the
//! host thread is parked in its join.

mod drain;

pub use drain::{DeliverLatest, DeliverOne, DrainPolicy};

use crate::signals::Message;

/// Sending half of a message queue.
pub type MessageSender = flume::Sender<Message>;
/// Receiving half of a message queue.
pub type MessageReceiver = flume::Receiver<Message>;

/// Creates one unbounded FIFO message queue.
pub fn pair() -> (MessageSender, MessageReceiver) {
    flume::unbounded()
}

/// Removes and returns every message currently pending on `rx`.
///
/// Non-blocking. Used when tearing a session down; anything still queued at
/// that point is post-terminal and only inspected for the final token.
pub fn drain(rx: &MessageReceiver) -> Vec<Message> {
    let mut pending = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        pending.push(msg);
    }
    pending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_preserves_fifo_order() {
        let (tx, rx) = pair();
        for i in 0..4 {
            tx.send(Message::payload(i)).unwrap();
        }
        let drained = drain(&rx);
        assert_eq!(drained.len(), 4);
        assert_eq!(drained[0], Message::payload(0));
        assert_eq!(drained[3], Message::payload(3));
        assert!(rx.is_empty());
    }
}
