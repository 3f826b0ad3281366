//! Deferred-callback queue.
//!
//! Entries are ordered by due time, then by registration order, so two
//! timers due at the same millisecond fire in the order they were set.

use core::cmp::{Ordering, Reverse};
use core::fmt;
use core::time::Duration;
use std::collections::BinaryHeap;
use turnloop_clock::duration_to_ms;

/// Largest delay honored as given; anything above is treated as
/// [`TIMEOUT_MIN_MS`].
pub const TIMEOUT_MAX_MS: u64 = (1 << 31) - 1;

/// Smallest effective delay. A requested delay of zero still waits for the
/// next turn and at least this long.
pub const TIMEOUT_MIN_MS: u64 = 1;

/// Clamp a requested delay to the effective delay in milliseconds.
///
/// Delays below [`TIMEOUT_MIN_MS`] or above [`TIMEOUT_MAX_MS`] become
/// [`TIMEOUT_MIN_MS`].
pub fn normalize_delay_ms(delay: Duration) -> u64 {
    let ms = duration_to_ms(delay);
    if (TIMEOUT_MIN_MS..=TIMEOUT_MAX_MS).contains(&ms) {
        ms
    } else {
        TIMEOUT_MIN_MS
    }
}

/// Handle identifying a registered timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Registration sequence number.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// A queued timer with its payload.
pub struct TimerEntry<T> {
    /// Identifier handed out at registration
    pub id: TimerId,
    /// Earliest clock reading at which the payload may run
    pub due_ms: u64,
    /// Clock reading at registration
    pub scheduled_ms: u64,
    /// The deferred work
    pub payload: T,
}

impl<T> TimerEntry<T> {
    #[inline]
    fn key(&self) -> (u64, TimerId) {
        (self.due_ms, self.id)
    }
}

impl<T> fmt::Debug for TimerEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEntry")
            .field("id", &self.id)
            .field("due_ms", &self.due_ms)
            .field("scheduled_ms", &self.scheduled_ms)
            .finish_non_exhaustive()
    }
}

impl<T> PartialEq for TimerEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for TimerEntry<T> {}

impl<T> PartialOrd for TimerEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TimerEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-heap of pending timers keyed by `(due_ms, id)`.
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<TimerEntry<T>>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_id: 0,
        }
    }

    /// Enqueue `payload` to become runnable `delay` after `now_ms`.
    ///
    /// The delay is normalized with [`normalize_delay_ms`].
    pub fn schedule(&mut self, now_ms: u64, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let due_ms = now_ms.saturating_add(normalize_delay_ms(delay));
        self.heap.push(Reverse(TimerEntry {
            id,
            due_ms,
            scheduled_ms: now_ms,
            payload,
        }));
        id
    }

    /// Due time of the earliest pending timer.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.due_ms)
    }

    /// Remove and return the earliest timer if it is due at `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<TimerEntry<T>> {
        if self.next_due_ms()? > now_ms {
            return None;
        }
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// Number of pending timers.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when no timers are pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.heap.len())
            .field("next_due_ms", &self.next_due_ms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delay_is_clamped_to_minimum() {
        assert_eq!(normalize_delay_ms(Duration::ZERO), 1);
        assert_eq!(normalize_delay_ms(Duration::from_micros(400)), 1);
    }

    #[test]
    fn test_delay_in_range_is_kept() {
        assert_eq!(normalize_delay_ms(Duration::from_millis(1)), 1);
        assert_eq!(normalize_delay_ms(Duration::from_millis(250)), 250);
        assert_eq!(
            normalize_delay_ms(Duration::from_millis(TIMEOUT_MAX_MS)),
            TIMEOUT_MAX_MS
        );
    }

    #[test]
    fn test_oversized_delay_is_clamped_to_minimum() {
        assert_eq!(
            normalize_delay_ms(Duration::from_millis(TIMEOUT_MAX_MS + 1)),
            TIMEOUT_MIN_MS
        );
    }

    #[test]
    fn test_pop_due_respects_due_time() {
        let mut queue = TimerQueue::new();
        queue.schedule(100, Duration::from_millis(50), "a");

        assert!(queue.pop_due(149).is_none());
        let entry = queue.pop_due(150);
        assert!(matches!(entry, Some(TimerEntry { payload: "a", due_ms: 150, .. })));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_earlier_due_fires_first() {
        let mut queue = TimerQueue::new();
        queue.schedule(0, Duration::from_millis(30), "late");
        queue.schedule(0, Duration::from_millis(10), "early");

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(1_000))
            .map(|entry| entry.payload)
            .collect();
        assert_eq!(order, vec!["early", "late"]);
    }

    #[test]
    fn test_equal_due_fires_in_registration_order() {
        let mut queue = TimerQueue::new();
        let first = queue.schedule(0, Duration::ZERO, 1);
        let second = queue.schedule(0, Duration::ZERO, 2);
        let third = queue.schedule(0, Duration::from_millis(1), 3);

        assert!(first < second && second < third);
        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(1))
            .map(|entry| entry.payload)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_due_time_saturates() {
        let mut queue = TimerQueue::new();
        queue.schedule(u64::MAX, Duration::from_millis(5), ());
        assert_eq!(queue.next_due_ms(), Some(u64::MAX));
    }

    #[test]
    fn test_timer_id_display() {
        let mut queue = TimerQueue::new();
        queue.schedule(0, Duration::ZERO, ());
        let id = queue.schedule(0, Duration::ZERO, ());
        assert_eq!(id.to_string(), "timer#1");
        assert_eq!(id.get(), 1);
    }
}
