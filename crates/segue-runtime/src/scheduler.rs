#![forbid(unsafe_code)]

//! Deterministic single-threaded timer scheduler.
//!
//! A [`Scheduler`] holds `(due, action)` pairs and hands actions back as
//! its clock passes their due time. There are no threads and no wall-clock
//! reads: time moves only when the owner calls [`Scheduler::advance`] (or
//! the finer-grained [`Scheduler::pop_due`] / [`Scheduler::settle`] pair).
//!
//! # Invariants
//!
//! 1. Actions fire in due-time order; ties fire in scheduling order.
//! 2. The scheduler clock never moves backwards.
//! 3. A cancelled timer never fires.
//! 4. An action scheduled while draining (from a fired action's handler) is
//!    due relative to the fire time of that action, so a single large
//!    `advance` produces the same sequence as many small ones.

use std::collections::VecDeque;
use std::time::Duration;

use segue_core::animation::Timeline;

/// Handle for cancelling a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<A> {
    id: TimerId,
    due: Duration,
    action: A,
}

/// Ordered timer queue driven by explicit time advances.
#[derive(Debug)]
pub struct Scheduler<A> {
    now: Duration,
    next_id: u64,
    pending: VecDeque<Pending<A>>,
}

impl<A> Scheduler<A> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: VecDeque::new(),
        }
    }

    /// Current scheduler time.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `action` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        let pos = self.pending.partition_point(|p| p.due <= due);
        self.pending.insert(pos, Pending { id, due, action });
        id
    }

    /// Schedule every cue of `timeline`, offsets measured from now.
    pub fn schedule_timeline(&mut self, timeline: Timeline<A>) -> Vec<TimerId> {
        timeline
            .into_cues()
            .into_iter()
            .map(|cue| self.schedule(cue.offset, cue.action))
            .collect()
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|p| p.id == id) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer; returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    /// Number of timers waiting to fire.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is scheduled.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the next timer.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.front().map(|p| p.due)
    }

    /// Pop the earliest action due at or before `until`, moving the clock
    /// to its due time.
    ///
    /// Callers that schedule follow-up work from a fired action should loop
    /// on this and then call [`settle`](Self::settle).
    pub fn pop_due(&mut self, until: Duration) -> Option<A> {
        if self.pending.front().is_some_and(|p| p.due <= until) {
            let next = self.pending.pop_front()?;
            self.now = self.now.max(next.due);
            Some(next.action)
        } else {
            None
        }
    }

    /// Move the clock to `until` without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Advance by `dt`, returning every action that came due, in order.
    pub fn advance(&mut self, dt: Duration) -> Vec<A> {
        let until = self.now.saturating_add(dt);
        let mut fired = Vec::new();
        while let Some(action) = self.pop_due(until) {
            fired.push(action);
        }
        self.settle(until);
        fired
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}
