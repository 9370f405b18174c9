//! Handoff: a single-slot, thread-safe synchronization cell.
//!
//! # Overview
//!
//! A [`Slot`] holds at most one value and coordinates producers and consumers
//! through blocking, timed, and non-blocking operations. It is the classic
//! MVar shape: `put` deposits a value and blocks while the slot is full,
//! `take` withdraws the value and blocks while the slot is empty, and `read`
//! observes the value without consuming it.
//!
//! All blocking happens on OS threads via a mutex and two condition
//! variables; there is no async runtime and no event loop.
//!
//! # Core Guarantees
//!
//! - **Capacity one**: at most one value is in the slot at any time; a put
//!   into a full slot waits (or fails, for the timed and try variants) until
//!   a take empties it
//! - **Take consumes, read preserves**: after `put(x)`, a `take` returns `x`
//!   and empties the slot; a `read` returns `x` and leaves it full
//! - **Atomic transitions**: occupancy and storage change together under the
//!   slot's lock; no thread observes a half-updated slot
//! - **No fairness**: when several threads block on the same transition,
//!   which one wakes first is unspecified
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use handoff::Slot;
//!
//! let slot = Arc::new(Slot::new());
//!
//! let producer = {
//!     let slot = Arc::clone(&slot);
//!     thread::spawn(move || slot.put("hello"))
//! };
//!
//! assert_eq!(slot.take(), "hello");
//! producer.join().unwrap();
//! ```
//!
//! # Module Structure
//!
//! - [`slot`]: the [`Slot`] primitive and its nine operations
//! - [`error`]: per-operation error types
//! - [`test_utils`]: tracing-based logging helpers for the test suite

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod slot;
pub mod test_utils;

pub use error::{
    PutTimeoutError, ReadTimeoutError, TakeTimeoutError, TryPutError, TryReadError, TryTakeError,
};
pub use slot::Slot;
