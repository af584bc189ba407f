//! # Message envelope.
//!
//! Everything traveling over a channel is a [`Message`], a tagged variant
//! separating protocol signals from opaque payload data. The tag removes the
//! hazard of a legitimate payload value colliding with a reserved or
//! allow-listed token: a payload string `"CLOSE"` is still just data.
//!
//! On the wire (between handler and worker process) a message is one
//! externally tagged JSON object per line, e.g.
//! `{"kind":"signal","body":"DONE"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::signals::Token;

/// A protocol signal or an opaque payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Message {
    /// A signal token: reserved, allow-listed, or unknown (unknown tokens are
    /// delivered upward as-is, like payloads, but keep their signal tag).
    Signal(Token),
    /// Arbitrary caller data. Never interpreted by the protocol.
    Payload(Value),
}

impl Message {
    /// Creates a signal message.
    pub fn signal(token: impl Into<Token>) -> Self {
        Message::Signal(token.into())
    }

    /// Creates a payload message from any JSON-ish value.
    pub fn payload(value: impl Into<Value>) -> Self {
        Message::Payload(value.into())
    }

    /// Creates a payload message by serializing `value`.
    pub fn payload_of<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Message::Payload(serde_json::to_value(value)?))
    }

    /// Returns the signal token, if this is a signal.
    pub fn as_signal(&self) -> Option<&Token> {
        match self {
            Message::Signal(token) => Some(token),
            Message::Payload(_) => None,
        }
    }

    /// Returns the payload value, if this is a payload.
    pub fn as_payload(&self) -> Option<&Value> {
        match self {
            Message::Signal(_) => None,
            Message::Payload(value) => Some(value),
        }
    }

    /// True if this is the given signal token.
    pub fn is_signal(&self, token: &Token) -> bool {
        self.as_signal() == Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_wire_shape() {
        let msg = Message::signal("DONE");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"kind":"signal","body":"DONE"}"#);
        assert_eq!(serde_json::from_str::<Message>(&json).unwrap(), msg);
    }

    #[test]
    fn test_payload_is_not_a_signal() {
        // A payload that happens to spell a reserved token stays data.
        let msg = Message::payload("CLOSE");
        assert!(msg.as_signal().is_none());
        assert_eq!(msg.as_payload(), Some(&Value::from("CLOSE")));
    }

    #[test]
    fn test_is_signal_compares_exact_token() {
        let msg = Message::signal("CHECK");
        assert!(msg.is_signal(&Token::from("CHECK")));
        assert!(!msg.is_signal(&Token::from("check")));
    }
}
