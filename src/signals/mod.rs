//! Signal vocabulary: tokens, the reserved signal set, and the message envelope.
//!
//! The protocol between host, handler, and worker speaks a small vocabulary of
//! opaque string tokens. Three of them are reserved and protocol-significant:
//!
//! - *Kill* (`"CLOSE"`): end the session early;
//! - *Done* (`"DONE"`): the worker finished (or acknowledged a kill);
//! - *Check* (`"CHECK"`): liveness probe.
//!
//! Callers may register extra tokens in an allow-list; only those are ever
//! forwarded toward the worker as commands. Everything that is not a signal
//! travels as an opaque [`Message::Payload`] and is never interpreted.

mod message;
mod set;
mod token;

pub use message::Message;
pub use set::{SignalSet, CHECK, DONE, KILL};
pub use token::Token;
