//! Timer Registry
//!
//! Deadline-based timers for the narration engine. The registry owns every
//! pending timer for one sequencer instance and guarantees they are
//! cancelable as a group: no callback can outlive a `cancel_all`.
//!
//! # Design
//!
//! Timers carry typed event payloads instead of closures. The owner polls
//! `fire_due` with an explicit `Instant` each frame and handles whatever
//! came due, the same way the avatar animator is driven by its event loop.
//! All time enters through arguments, which keeps every timing property
//! testable without sleeping.

use std::time::{Duration, Instant};

/// Minimum repeating interval, so a zero-length tick can never spin.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a scheduled timer.
///
/// Canceling a handle that already fired (or was never scheduled here)
/// is a no-op, never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Debug)]
struct TimerEntry<E> {
    handle: TimerHandle,
    deadline: Instant,
    /// Re-arm interval for repeating timers.
    repeat: Option<Duration>,
    event: E,
}

/// Registry owning the single-shot and repeating timers of one owner.
#[derive(Debug)]
pub struct TimerRegistry<E> {
    entries: Vec<TimerEntry<E>>,
    next_id: u64,
}

impl<E: Clone> TimerRegistry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    fn next_handle(&mut self) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// Schedule a single-shot timer firing `delay` after `now`.
    pub fn schedule_once(&mut self, now: Instant, delay: Duration, event: E) -> TimerHandle {
        let handle = self.next_handle();
        self.entries.push(TimerEntry {
            handle,
            deadline: now + delay,
            repeat: None,
            event,
        });
        handle
    }

    /// Schedule a repeating timer firing every `interval` after `now`.
    ///
    /// Repeating timers re-arm from their own deadline, not from the poll
    /// time, so a late poll fires the missed ticks instead of drifting.
    pub fn schedule_repeating(&mut self, now: Instant, interval: Duration, event: E) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let handle = self.next_handle();
        self.entries.push(TimerEntry {
            handle,
            deadline: now + interval,
            repeat: Some(interval),
            event,
        });
        handle
    }

    /// Cancel a single timer. Unknown or already-fired handles are ignored.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    /// Cancel every pending timer. Safe to call repeatedly.
    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            tracing::trace!(canceled = self.entries.len(), "canceling all timers");
        }
        self.entries.clear();
    }

    /// Drain and return every event whose deadline has passed, in deadline
    /// order (ties resolve in scheduling order). Single-shot entries are
    /// removed; repeating entries re-arm and may fire more than once per
    /// call if the poll was late.
    pub fn fire_due(&mut self, now: Instant) -> Vec<E> {
        let mut fired = Vec::new();
        loop {
            let due = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.deadline <= now)
                .min_by_key(|(_, e)| e.deadline)
                .map(|(i, _)| i);

            let Some(i) = due else { break };

            fired.push(self.entries[i].event.clone());
            match self.entries[i].repeat {
                Some(interval) => {
                    let entry = &mut self.entries[i];
                    entry.deadline += interval;
                }
                None => {
                    self.entries.remove(i);
                }
            }
        }
        fired
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline, for event-loop sleep budgeting.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }
}

impl<E: Clone> Default for TimerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_once_fires_after_delay() {
        let now = Instant::now();
        let mut timers = TimerRegistry::new();
        timers.schedule_once(now, 10 * MS, "a");

        assert!(timers.fire_due(now + 9 * MS).is_empty());
        assert_eq!(timers.fire_due(now + 10 * MS), vec!["a"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_fire_order_is_deadline_order() {
        let now = Instant::now();
        let mut timers = TimerRegistry::new();
        timers.schedule_once(now, 20 * MS, "late");
        timers.schedule_once(now, 5 * MS, "early");

        assert_eq!(timers.fire_due(now + 30 * MS), vec!["early", "late"]);
    }

    #[test]
    fn test_repeating_catches_up_without_drift() {
        let now = Instant::now();
        let mut timers = TimerRegistry::new();
        timers.schedule_repeating(now, 10 * MS, "tick");

        // A late poll fires every missed tick.
        assert_eq!(timers.fire_due(now + 35 * MS).len(), 3);
        // Next deadline stays on the original 10ms grid.
        assert_eq!(timers.next_deadline(), Some(now + 40 * MS));
    }

    #[test]
    fn test_cancel_unknown_handle_is_noop() {
        let now = Instant::now();
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule_once(now, MS, "a");
        assert_eq!(timers.fire_due(now + MS), vec!["a"]);

        // Already fired - canceling must not error or remove anything else.
        timers.schedule_once(now, 5 * MS, "b");
        timers.cancel(handle);
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn test_cancel_all_is_idempotent() {
        let now = Instant::now();
        let mut timers = TimerRegistry::new();
        timers.schedule_once(now, MS, "a");
        timers.schedule_repeating(now, MS, "b");

        timers.cancel_all();
        assert!(timers.is_empty());
        timers.cancel_all();
        assert!(timers.is_empty());
        assert!(timers.fire_due(now + 10 * MS).is_empty());
    }

    #[test]
    fn test_next_deadline_tracks_earliest() {
        let now = Instant::now();
        let mut timers: TimerRegistry<&str> = TimerRegistry::new();
        assert_eq!(timers.next_deadline(), None);

        timers.schedule_once(now, 20 * MS, "late");
        let early = timers.schedule_once(now, 5 * MS, "early");
        assert_eq!(timers.next_deadline(), Some(now + 5 * MS));

        timers.cancel(early);
        assert_eq!(timers.next_deadline(), Some(now + 20 * MS));
    }
}
