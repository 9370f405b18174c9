//! Error types returned by [`Slot`](crate::Slot) operations.
//!
//! Two failure families exist, one per bounded-wait style:
//!
//! - **Would-block**: the non-blocking variants fail immediately when the
//!   slot's lock is held by another thread or the slot is in the wrong
//!   occupancy state for the operation. The two causes are deliberately not
//!   distinguished; both are transient and callers react the same way
//!   (retry later or back off).
//! - **Timeout**: the timed variants fail once their deadline elapses with
//!   the occupancy predicate still false. A timeout is an expected outcome
//!   of a bounded wait, never retried internally.
//!
//! The blocking operations have no error type: they either complete or keep
//! waiting. Put-direction errors carry the rejected value back to the caller
//! so nothing is lost on failure.

use std::fmt;

/// Error returned when [`Slot::try_put`](crate::Slot::try_put) cannot
/// complete without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryPutError<T> {
    /// The slot lock was contended, or the slot already held a value.
    ///
    /// Carries the rejected value so the caller can retry with it.
    WouldBlock(T),
}

impl<T> TryPutError<T> {
    /// Consumes the error, returning the value that was not stored.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::WouldBlock(value) => value,
        }
    }
}

impl<T> fmt::Display for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldBlock(_) => write!(f, "putting into the slot would block"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for TryPutError<T> {}

/// Error returned when [`Slot::try_take`](crate::Slot::try_take) cannot
/// complete without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryTakeError {
    /// The slot lock was contended, or the slot was empty.
    WouldBlock,
}

impl fmt::Display for TryTakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldBlock => write!(f, "taking from the slot would block"),
        }
    }
}

impl std::error::Error for TryTakeError {}

/// Error returned when [`Slot::try_read`](crate::Slot::try_read) cannot
/// complete without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryReadError {
    /// The slot lock was contended, or the slot was empty.
    WouldBlock,
}

impl fmt::Display for TryReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldBlock => write!(f, "reading the slot would block"),
        }
    }
}

impl std::error::Error for TryReadError {}

/// Error returned when [`Slot::put_timeout`](crate::Slot::put_timeout)
/// reaches its deadline with the slot still full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutTimeoutError<T> {
    /// The deadline elapsed before the slot emptied.
    ///
    /// Carries the rejected value so the caller can retry with it.
    Timeout(T),
}

impl<T> PutTimeoutError<T> {
    /// Consumes the error, returning the value that was not stored.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Timeout(value) => value,
        }
    }
}

impl<T> fmt::Display for PutTimeoutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(_) => write!(f, "timed out waiting for the slot to empty"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for PutTimeoutError<T> {}

/// Error returned when [`Slot::take_timeout`](crate::Slot::take_timeout)
/// reaches its deadline with the slot still empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeTimeoutError {
    /// The deadline elapsed before the slot filled.
    Timeout,
}

impl fmt::Display for TakeTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for the slot to fill"),
        }
    }
}

impl std::error::Error for TakeTimeoutError {}

/// Error returned when [`Slot::read_timeout`](crate::Slot::read_timeout)
/// reaches its deadline with the slot still empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTimeoutError {
    /// The deadline elapsed before the slot filled.
    Timeout,
}

impl fmt::Display for ReadTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for the slot to fill"),
        }
    }
}

impl std::error::Error for ReadTimeoutError {}
