//! # Opaque signal token.
//!
//! A [`Token`] is a cheap-to-clone, case-sensitive string identifier. Tokens
//! carry no behavior on their own; meaning is assigned by the
//! [`SignalSet`](crate::SignalSet) they are registered in.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque, comparable signal token.
///
/// Comparison is exact and case-sensitive. Tokens serialize transparently as
/// plain strings on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(Arc<str>);

impl Token {
    /// Creates a token from any string-ish value.
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
