//! Defines the error types surfaced by the Everclock public API.
//!
//! All failures here are local and synchronous: the engine performs no I/O,
//! so there are no transient or recoverable failure modes. Callers either
//! passed a malformed timestamp or misused the subscriber registry.

use thiserror::Error;

use crate::common::{UnixSeconds, UpdateKind};

/// Result alias for fallible Everclock operations.
pub type ClockResult<T> = Result<T, ClockError>;

/// Errors returned by clock queries and subscription management.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    /// An explicit timestamp argument was outside the 10-digit UNIX range.
    #[error("invalid timestamp {0}, expected 10-digit UNIX seconds")]
    InvalidTimestamp(UnixSeconds),

    /// A subscriber key was empty.
    #[error("subscriber key must not be empty")]
    InvalidSubscriberKey,

    /// The key is already registered in the targeted category.
    #[error("subscriber '{key}' is already registered for {kind} updates")]
    DuplicateSubscriber { key: String, kind: UpdateKind },

    /// No subscriber with that key exists in the targeted category.
    #[error("no subscriber '{key}' registered for {kind} updates")]
    SubscriberNotFound { key: String, kind: UpdateKind },
}
