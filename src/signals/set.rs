//! # Reserved signal set and command allow-list.
//!
//! [`SignalSet`] is an explicit, immutable configuration value constructed
//! once and shared by reference between the host and its handler. The three
//! reserved tokens must be pairwise distinct; this is validated at
//! construction time and never re-checked at runtime.
//!
//! The allow-list (`forward`) names the extra tokens a caller may send that
//! the handler forwards verbatim toward the worker. A non-empty allow-list is
//! what causes a worker command channel to be created at session start.
//!
//! # Example
//! ```
//! use prochost::{SignalSet, Token};
//!
//! let signals = SignalSet::default()
//!     .with_forward(["QUERY", "SOURCE"].map(Token::from))
//!     .unwrap();
//!
//! assert!(signals.is_terminal(&Token::from("CLOSE")));
//! assert!(signals.is_forwardable(&Token::from("QUERY")));
//! assert!(!signals.is_forwardable(&Token::from("CLOSE")));
//! ```

use std::collections::HashSet;

use crate::error::HostError;
use crate::signals::Token;

/// Default *Kill* token: ends the session early.
pub const KILL: &str = "CLOSE";
/// Default *Done* token: the worker finished (or acknowledged a kill).
pub const DONE: &str = "DONE";
/// Default *Check* token: liveness probe.
pub const CHECK: &str = "CHECK";

/// Immutable vocabulary of reserved signal tokens plus a command allow-list.
#[derive(Clone, Debug)]
pub struct SignalSet {
    kill: Token,
    done: Token,
    check: Token,
    forward: HashSet<Token>,
}

impl SignalSet {
    /// Creates a signal set with the given reserved tokens.
    ///
    /// Fails with [`HostError::SignalCollision`] unless the three tokens are
    /// pairwise distinct.
    pub fn new(
        kill: impl Into<Token>,
        done: impl Into<Token>,
        check: impl Into<Token>,
    ) -> Result<Self, HostError> {
        let (kill, done, check) = (kill.into(), done.into(), check.into());
        if kill == done || done == check {
            return Err(HostError::SignalCollision { token: done });
        }
        if kill == check {
            return Err(HostError::SignalCollision { token: check });
        }
        Ok(Self {
            kill,
            done,
            check,
            forward: HashSet::new(),
        })
    }

    /// Extends the allow-list of tokens forwardable toward the worker.
    ///
    /// Fails with [`HostError::SignalCollision`] if any token collides with a
    /// reserved token or with an already-registered allow-list entry.
    pub fn with_forward(mut self, tokens: impl IntoIterator<Item = Token>) -> Result<Self, HostError> {
        for token in tokens {
            if self.is_reserved(&token) || !self.forward.insert(token.clone()) {
                return Err(HostError::SignalCollision { token });
            }
        }
        Ok(self)
    }

    /// The *Kill* token.
    pub fn kill(&self) -> &Token {
        &self.kill
    }

    /// The *Done* token.
    pub fn done(&self) -> &Token {
        &self.done
    }

    /// The *Check* token.
    pub fn check(&self) -> &Token {
        &self.check
    }

    /// True if `token` requests or reports termination (*Kill* or *Done*).
    pub fn is_terminal(&self, token: &Token) -> bool {
        *token == self.kill || *token == self.done
    }

    /// True if `token` is the liveness probe.
    pub fn is_check(&self, token: &Token) -> bool {
        *token == self.check
    }

    /// True if `token` is any of the three reserved tokens.
    pub fn is_reserved(&self, token: &Token) -> bool {
        self.is_terminal(token) || self.is_check(token)
    }

    /// True if `token` is on the caller-defined allow-list.
    pub fn is_forwardable(&self, token: &Token) -> bool {
        self.forward.contains(token)
    }

    /// True if an allow-list was configured (a command channel will exist).
    pub fn has_forward(&self) -> bool {
        !self.forward.is_empty()
    }
}

impl Default for SignalSet {
    /// The default vocabulary: `CLOSE` / `DONE` / `CHECK`, empty allow-list.
    fn default() -> Self {
        Self {
            kill: Token::from(KILL),
            done: Token::from(DONE),
            check: Token::from(CHECK),
            forward: HashSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tokens() {
        let signals = SignalSet::default();
        assert_eq!(*signals.kill(), KILL);
        assert_eq!(*signals.done(), DONE);
        assert_eq!(*signals.check(), CHECK);
        assert!(!signals.has_forward());
    }

    #[test]
    fn test_equal_reserved_tokens_rejected() {
        assert!(SignalSet::new("A", "A", "C").is_err());
        assert!(SignalSet::new("A", "B", "B").is_err());
        assert!(SignalSet::new("A", "B", "A").is_err());
        assert!(SignalSet::new("A", "A", "A").is_err());
        assert!(SignalSet::new("A", "B", "C").is_ok());
    }

    #[test]
    fn test_forward_collision_with_reserved() {
        let err = SignalSet::default()
            .with_forward([Token::from(KILL)])
            .unwrap_err();
        assert_eq!(err.as_label(), "host_signal_collision");
    }

    #[test]
    fn test_forward_duplicate_rejected() {
        let err = SignalSet::default()
            .with_forward([Token::from("QUERY"), Token::from("QUERY")])
            .unwrap_err();
        assert_eq!(err.as_label(), "host_signal_collision");
    }

    #[test]
    fn test_classification() {
        let signals = SignalSet::default()
            .with_forward([Token::from("QUERY")])
            .unwrap();

        assert!(signals.is_terminal(&Token::from(KILL)));
        assert!(signals.is_terminal(&Token::from(DONE)));
        assert!(!signals.is_terminal(&Token::from(CHECK)));
        assert!(signals.is_check(&Token::from(CHECK)));
        assert!(signals.is_reserved(&Token::from(CHECK)));
        assert!(signals.is_forwardable(&Token::from("QUERY")));
        assert!(!signals.is_forwardable(&Token::from("query")));
        assert!(!signals.is_reserved(&Token::from("QUERY")));
    }
}
