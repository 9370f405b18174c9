//! Single-slot handoff cell with blocking, timed, and non-blocking operations.
//!
//! A [`Slot`] is a capacity-one rendezvous point between producer and
//! consumer threads:
//!
//! ```text
//!              put                          take
//!   Empty ──────────────► Full   Full ──────────────► Empty
//!           signals                       signals
//!           not_empty                     not_full
//!
//!   Full ──────────────► Full            (read: no transition, no signal)
//! ```
//!
//! The occupancy flag and the stored value are one field (`Option<T>`)
//! guarded by a single mutex, so they cannot disagree. Producers blocked in
//! [`Slot::put`] wait on the `not_full` condition; consumers blocked in
//! [`Slot::take`] or [`Slot::read`] wait on `not_empty`.
//!
//! # Waiting
//!
//! Blocking operations wait indefinitely. Timed operations compute one
//! absolute deadline at entry from the supplied duration; the deadline
//! bounds lock acquisition as well as the condition wait, and the occupancy
//! predicate is re-checked in a loop until it holds or the deadline elapses.
//! A spurious wakeup before the deadline therefore cannot produce a false
//! timeout. Non-blocking operations never wait: a contended lock and a
//! wrong occupancy state both fail with the same would-block error.
//!
//! # Fairness
//!
//! None. Each transition signals one waiter; when several threads block on
//! the same condition, which one wakes first is unspecified.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::error::{
    PutTimeoutError, ReadTimeoutError, TakeTimeoutError, TryPutError, TryReadError, TryTakeError,
};

/// A single-slot, thread-safe handoff cell.
///
/// Holds at most one `T`. Share it between threads behind an [`Arc`] and
/// call the operations through `&self`.
///
/// [`Arc`]: std::sync::Arc
///
/// # Example
///
/// ```
/// use handoff::Slot;
///
/// let slot = Slot::new();
///
/// slot.put(7);
/// assert!(!slot.is_empty());
/// assert_eq!(slot.take(), 7);
/// assert!(slot.is_empty());
/// ```
pub struct Slot<T> {
    /// Storage and occupancy flag in one: `Some` means occupied.
    value: Mutex<Option<T>>,
    /// Signaled on the full to empty transition; waiters are producers.
    not_full: Condvar,
    /// Signaled on the empty to full transition; waiters are consumers.
    not_empty: Condvar,
    /// Mirror of `value.is_some()`, written only while the lock is held.
    /// Read without the lock only by [`Slot::is_empty`].
    occupied: AtomicBool,
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("occupied", &self.occupied.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slot<T> {
    /// Creates a new, empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            occupied: AtomicBool::new(false),
        }
    }

    /// Returns true if the slot held no value at the moment of the call.
    ///
    /// This is a best-effort snapshot taken without the lock: under
    /// concurrency it is stale by the time the caller sees it. Useful for
    /// diagnostics, never as a synchronization point; to act on occupancy,
    /// use one of the operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.occupied.load(Ordering::Relaxed)
    }

    /// Deposits a value into the slot, waiting until it is empty.
    ///
    /// # Blocking
    ///
    /// If the slot is full, waits on the `not_full` condition until a take
    /// empties it. There is no deadline; see [`Slot::put_timeout`] and
    /// [`Slot::try_put`] for bounded variants.
    ///
    /// # Example
    ///
    /// ```
    /// use handoff::Slot;
    ///
    /// let slot = Slot::new();
    /// slot.put("payload");
    /// assert_eq!(slot.take(), "payload");
    /// ```
    pub fn put(&self, value: T) {
        let mut slot = self.value.lock();
        while slot.is_some() {
            trace!("slot::put waiting for the slot to empty");
            self.not_full.wait(&mut slot);
        }
        *slot = Some(value);
        self.occupied.store(true, Ordering::Relaxed);
        drop(slot);
        self.not_empty.notify_one();
    }

    /// Withdraws the value from the slot, waiting until it is full.
    ///
    /// Consumes the slot's content: a subsequent take or read sees an empty
    /// slot until the next put.
    ///
    /// # Blocking
    ///
    /// If the slot is empty, waits on the `not_empty` condition until a put
    /// fills it. There is no deadline; see [`Slot::take_timeout`] and
    /// [`Slot::try_take`] for bounded variants.
    pub fn take(&self) -> T {
        let mut slot = self.value.lock();
        loop {
            if let Some(value) = slot.take() {
                self.occupied.store(false, Ordering::Relaxed);
                drop(slot);
                self.not_full.notify_one();
                return value;
            }
            trace!("slot::take waiting for the slot to fill");
            self.not_empty.wait(&mut slot);
        }
    }

    /// Reads the value in the slot without removing it, waiting until the
    /// slot is full.
    ///
    /// The value stays available to later reads and to a take. No signal is
    /// raised: the slot's state does not change. Several threads may read
    /// the same value.
    ///
    /// # Blocking
    ///
    /// If the slot is empty, waits on the `not_empty` condition until a put
    /// fills it. There is no deadline; see [`Slot::read_timeout`] and
    /// [`Slot::try_read`] for bounded variants.
    ///
    /// # Example
    ///
    /// ```
    /// use handoff::Slot;
    ///
    /// let slot = Slot::new();
    /// slot.put(3);
    /// assert_eq!(slot.read(), 3);
    /// assert_eq!(slot.take(), 3);
    /// ```
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        let mut slot = self.value.lock();
        loop {
            if let Some(value) = slot.as_ref() {
                return value.clone();
            }
            trace!("slot::read waiting for the slot to fill");
            self.not_empty.wait(&mut slot);
        }
    }

    /// Deposits a value, waiting at most `timeout` for the slot to empty.
    ///
    /// The deadline is computed once at entry and bounds both lock
    /// acquisition and the condition wait. The occupancy predicate is
    /// re-checked in a loop until the deadline, so a spurious wakeup with
    /// time remaining goes back to waiting instead of reporting a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PutTimeoutError::Timeout`], carrying the value back, if the
    /// deadline elapses with the slot still full.
    pub fn put_timeout(&self, value: T, timeout: Duration) -> Result<(), PutTimeoutError<T>> {
        let deadline = Instant::now() + timeout;
        let Some(mut slot) = self.value.try_lock_until(deadline) else {
            trace!("slot::put_timeout lock acquisition timed out");
            return Err(PutTimeoutError::Timeout(value));
        };
        loop {
            if slot.is_none() {
                *slot = Some(value);
                self.occupied.store(true, Ordering::Relaxed);
                drop(slot);
                self.not_empty.notify_one();
                return Ok(());
            }
            trace!("slot::put_timeout waiting for the slot to empty");
            if self.not_full.wait_until(&mut slot, deadline).timed_out() && slot.is_some() {
                trace!("slot::put_timeout deadline elapsed with the slot full");
                return Err(PutTimeoutError::Timeout(value));
            }
        }
    }

    /// Withdraws the value, waiting at most `timeout` for the slot to fill.
    ///
    /// The deadline is computed once at entry and bounds both lock
    /// acquisition and the condition wait. The occupancy predicate is
    /// re-checked in a loop until the deadline, so a spurious wakeup with
    /// time remaining goes back to waiting instead of reporting a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TakeTimeoutError::Timeout`] if the deadline elapses with
    /// the slot still empty.
    pub fn take_timeout(&self, timeout: Duration) -> Result<T, TakeTimeoutError> {
        let deadline = Instant::now() + timeout;
        let Some(mut slot) = self.value.try_lock_until(deadline) else {
            trace!("slot::take_timeout lock acquisition timed out");
            return Err(TakeTimeoutError::Timeout);
        };
        loop {
            if let Some(value) = slot.take() {
                self.occupied.store(false, Ordering::Relaxed);
                drop(slot);
                self.not_full.notify_one();
                return Ok(value);
            }
            trace!("slot::take_timeout waiting for the slot to fill");
            if self.not_empty.wait_until(&mut slot, deadline).timed_out() && slot.is_none() {
                trace!("slot::take_timeout deadline elapsed with the slot empty");
                return Err(TakeTimeoutError::Timeout);
            }
        }
    }

    /// Reads the value without removing it, waiting at most `timeout` for
    /// the slot to fill.
    ///
    /// The deadline is computed once at entry and bounds both lock
    /// acquisition and the condition wait. The occupancy predicate is
    /// re-checked in a loop until the deadline, so a spurious wakeup with
    /// time remaining goes back to waiting instead of reporting a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ReadTimeoutError::Timeout`] if the deadline elapses with
    /// the slot still empty.
    pub fn read_timeout(&self, timeout: Duration) -> Result<T, ReadTimeoutError>
    where
        T: Clone,
    {
        let deadline = Instant::now() + timeout;
        let Some(mut slot) = self.value.try_lock_until(deadline) else {
            trace!("slot::read_timeout lock acquisition timed out");
            return Err(ReadTimeoutError::Timeout);
        };
        loop {
            if let Some(value) = slot.as_ref() {
                return Ok(value.clone());
            }
            trace!("slot::read_timeout waiting for the slot to fill");
            if self.not_empty.wait_until(&mut slot, deadline).timed_out() && slot.is_none() {
                trace!("slot::read_timeout deadline elapsed with the slot empty");
                return Err(ReadTimeoutError::Timeout);
            }
        }
    }

    /// Attempts to deposit a value without waiting.
    ///
    /// Fails immediately when the lock is held by another thread, even if
    /// the slot would have had room: treat the failure as transient, not as
    /// a statement about occupancy.
    ///
    /// # Errors
    ///
    /// Returns [`TryPutError::WouldBlock`], carrying the value back, if the
    /// lock was contended or the slot was full.
    pub fn try_put(&self, value: T) -> Result<(), TryPutError<T>> {
        let Some(mut slot) = self.value.try_lock() else {
            return Err(TryPutError::WouldBlock(value));
        };
        if slot.is_some() {
            return Err(TryPutError::WouldBlock(value));
        }
        *slot = Some(value);
        self.occupied.store(true, Ordering::Relaxed);
        drop(slot);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Attempts to withdraw the value without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TryTakeError::WouldBlock`] if the lock was contended or the
    /// slot was empty.
    pub fn try_take(&self) -> Result<T, TryTakeError> {
        let Some(mut slot) = self.value.try_lock() else {
            return Err(TryTakeError::WouldBlock);
        };
        match slot.take() {
            Some(value) => {
                self.occupied.store(false, Ordering::Relaxed);
                drop(slot);
                self.not_full.notify_one();
                Ok(value)
            }
            None => Err(TryTakeError::WouldBlock),
        }
    }

    /// Attempts to read the value without removing it and without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TryReadError::WouldBlock`] if the lock was contended or the
    /// slot was empty.
    pub fn try_read(&self) -> Result<T, TryReadError>
    where
        T: Clone,
    {
        let Some(slot) = self.value.try_lock() else {
            return Err(TryReadError::WouldBlock);
        };
        match slot.as_ref() {
            Some(value) => Ok(value.clone()),
            None => Err(TryReadError::WouldBlock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn put_then_take() {
        init_test("put_then_take");
        let slot = Slot::new();

        slot.put(42);
        let value = slot.take();
        crate::assert_with_log!(value == 42, "taken value", 42, value);
        crate::test_complete!("put_then_take");
    }

    #[test]
    fn take_empties_the_slot() {
        init_test("take_empties_the_slot");
        let slot = Slot::new();

        slot.put(1);
        let _ = slot.take();

        let after = slot.try_take();
        crate::assert_with_log!(
            after == Err(TryTakeError::WouldBlock),
            "take after take",
            "Err(WouldBlock)",
            format!("{after:?}")
        );
        crate::test_complete!("take_empties_the_slot");
    }

    #[test]
    fn read_preserves_the_value() {
        init_test("read_preserves_the_value");
        let slot = Slot::new();

        slot.put(7);
        let first = slot.read();
        crate::assert_with_log!(first == 7, "first read", 7, first);
        let second = slot.read();
        crate::assert_with_log!(second == 7, "second read", 7, second);

        let taken = slot.take();
        crate::assert_with_log!(taken == 7, "take after reads", 7, taken);
        crate::test_complete!("read_preserves_the_value");
    }

    #[test]
    fn try_put_when_full_hands_back_the_value() {
        init_test("try_put_when_full_hands_back_the_value");
        let slot = Slot::new();

        slot.put(1);
        let result = slot.try_put(2);
        crate::assert_with_log!(
            result == Err(TryPutError::WouldBlock(2)),
            "try_put on full slot",
            "Err(WouldBlock(2))",
            format!("{result:?}")
        );

        // The original occupant is untouched.
        let kept = slot.take();
        crate::assert_with_log!(kept == 1, "original value kept", 1, kept);
        crate::test_complete!("try_put_when_full_hands_back_the_value");
    }

    #[test]
    fn try_take_and_try_read_when_empty() {
        init_test("try_take_and_try_read_when_empty");
        let slot: Slot<i32> = Slot::new();

        let take_result = slot.try_take();
        crate::assert_with_log!(
            take_result == Err(TryTakeError::WouldBlock),
            "try_take on empty slot",
            "Err(WouldBlock)",
            format!("{take_result:?}")
        );
        let read_result = slot.try_read();
        crate::assert_with_log!(
            read_result == Err(TryReadError::WouldBlock),
            "try_read on empty slot",
            "Err(WouldBlock)",
            format!("{read_result:?}")
        );
        crate::test_complete!("try_take_and_try_read_when_empty");
    }

    #[test]
    fn try_variants_succeed_when_state_allows() {
        init_test("try_variants_succeed_when_state_allows");
        let slot = Slot::new();

        let put = slot.try_put(5);
        crate::assert_with_log!(put.is_ok(), "try_put on empty slot", true, put.is_ok());

        let read = slot.try_read();
        crate::assert_with_log!(read == Ok(5), "try_read on full slot", "Ok(5)", format!("{read:?}"));

        let take = slot.try_take();
        crate::assert_with_log!(take == Ok(5), "try_take on full slot", "Ok(5)", format!("{take:?}"));
        crate::test_complete!("try_variants_succeed_when_state_allows");
    }

    #[test]
    fn is_empty_tracks_transitions() {
        init_test("is_empty_tracks_transitions");
        let slot = Slot::new();

        crate::assert_with_log!(slot.is_empty(), "new slot empty", true, slot.is_empty());
        slot.put(1);
        crate::assert_with_log!(!slot.is_empty(), "full after put", false, slot.is_empty());
        let _ = slot.read();
        crate::assert_with_log!(!slot.is_empty(), "still full after read", false, slot.is_empty());
        let _ = slot.take();
        crate::assert_with_log!(slot.is_empty(), "empty after take", true, slot.is_empty());
        crate::test_complete!("is_empty_tracks_transitions");
    }

    #[test]
    fn timed_variants_succeed_without_waiting_when_state_allows() {
        init_test("timed_variants_succeed_without_waiting_when_state_allows");
        let slot = Slot::new();

        let put = slot.put_timeout(9, Duration::from_millis(10));
        crate::assert_with_log!(put.is_ok(), "put_timeout into empty slot", true, put.is_ok());

        let read = slot.read_timeout(Duration::from_millis(10));
        crate::assert_with_log!(read == Ok(9), "read_timeout on full slot", "Ok(9)", format!("{read:?}"));

        let take = slot.take_timeout(Duration::from_millis(10));
        crate::assert_with_log!(take == Ok(9), "take_timeout on full slot", "Ok(9)", format!("{take:?}"));
        crate::test_complete!("timed_variants_succeed_without_waiting_when_state_allows");
    }

    #[test]
    fn take_timeout_times_out_on_empty_slot() {
        init_test("take_timeout_times_out_on_empty_slot");
        let slot: Slot<i32> = Slot::new();

        let result = slot.take_timeout(Duration::from_millis(20));
        crate::assert_with_log!(
            result == Err(TakeTimeoutError::Timeout),
            "take_timeout on empty slot",
            "Err(Timeout)",
            format!("{result:?}")
        );
        crate::test_complete!("take_timeout_times_out_on_empty_slot");
    }

    #[test]
    fn put_timeout_times_out_and_hands_back_the_value() {
        init_test("put_timeout_times_out_and_hands_back_the_value");
        let slot = Slot::new();

        slot.put(1);
        let err = match slot.put_timeout(2, Duration::from_millis(20)) {
            Err(err) => err,
            Ok(()) => panic!("put_timeout succeeded on a full slot"),
        };
        let returned = err.into_value();
        crate::assert_with_log!(returned == 2, "value handed back", 2, returned);

        let kept = slot.take();
        crate::assert_with_log!(kept == 1, "original value kept", 1, kept);
        crate::test_complete!("put_timeout_times_out_and_hands_back_the_value");
    }

    #[test]
    fn read_timeout_times_out_on_empty_slot() {
        init_test("read_timeout_times_out_on_empty_slot");
        let slot: Slot<i32> = Slot::new();

        let result = slot.read_timeout(Duration::from_millis(20));
        crate::assert_with_log!(
            result == Err(ReadTimeoutError::Timeout),
            "read_timeout on empty slot",
            "Err(Timeout)",
            format!("{result:?}")
        );
        crate::test_complete!("read_timeout_times_out_on_empty_slot");
    }

    #[test]
    fn put_into_full_slot_blocks_until_take() {
        init_test("put_into_full_slot_blocks_until_take");
        let slot = Arc::new(Slot::new());
        slot.put(1);

        let finished = Arc::new(AtomicBool::new(false));
        let finished_clone = Arc::clone(&finished);
        let slot_clone = Arc::clone(&slot);

        let handle = thread::spawn(move || {
            slot_clone.put(2);
            finished_clone.store(true, Ordering::SeqCst);
        });

        // The slot stays full, so the second put cannot have completed.
        for _ in 0..1_000 {
            thread::yield_now();
        }
        let finished_now = finished.load(Ordering::SeqCst);
        crate::assert_with_log!(
            !finished_now,
            "put completed despite full slot",
            false,
            finished_now
        );

        let first = slot.take();
        crate::assert_with_log!(first == 1, "first take", 1, first);
        let second = slot.take();
        crate::assert_with_log!(second == 2, "second take", 2, second);

        handle.join().expect("producer thread panicked");
        let finished_now = finished.load(Ordering::SeqCst);
        crate::assert_with_log!(finished_now, "producer finished", true, finished_now);
        crate::test_complete!("put_into_full_slot_blocks_until_take");
    }

    #[test]
    fn value_is_moved_not_cloned() {
        init_test("value_is_moved_not_cloned");

        #[derive(Debug)]
        struct NonClone(i32);

        let slot = Slot::new();
        slot.put(NonClone(42));
        let value = slot.take();
        crate::assert_with_log!(value.0 == 42, "moved value", 42, value.0);
        crate::test_complete!("value_is_moved_not_cloned");
    }

    #[test]
    fn debug_reports_occupancy() {
        init_test("debug_reports_occupancy");

        // Debug must not require T: Debug.
        struct Opaque;
        let slot = Slot::new();
        let rendered = format!("{slot:?}");
        crate::assert_with_log!(
            rendered.contains("occupied: false"),
            "debug shows empty",
            true,
            rendered
        );
        slot.put(Opaque);
        let rendered = format!("{slot:?}");
        crate::assert_with_log!(
            rendered.contains("occupied: true"),
            "debug shows full",
            true,
            rendered
        );
        crate::test_complete!("debug_reports_occupancy");
    }
}
