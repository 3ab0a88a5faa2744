//! Caller-registered observation of call outcomes.
//!
//! The core keeps no global state. A caller that wants metrics registers an
//! [`Observer`] on its [`Hasher`](crate::Hasher) and bridges events into its
//! own registry. Events never carry secrets or derived material.

use std::time::Duration;

/// The entry point that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Hash,
    Verify,
}

/// How a call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A record was produced, or the candidate matched.
    Succeeded,
    /// Verification completed and the candidate was wrong.
    Rejected,
    /// A structural or operational failure.
    Errored,
}

/// Receives one event per [`Hasher`](crate::Hasher) call.
pub trait Observer: Send + Sync {
    fn observe(&self, operation: Operation, outcome: Outcome, elapsed: Duration);
}
