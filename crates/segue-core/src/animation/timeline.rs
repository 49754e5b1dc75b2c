#![forbid(unsafe_code)]

//! Timeline: an ordered list of `(offset, action)` cues.
//!
//! A [`Timeline`] is pure data describing *when* things happen relative to a
//! start point. It does not run anything; a scheduler consumes it and fires
//! the actions as its clock passes each offset.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use segue_core::animation::Timeline;
//!
//! let timeline = Timeline::new()
//!     .add(Duration::from_millis(300), "first")
//!     .then(Duration::from_millis(345), "second")
//!     .add(Duration::ZERO, "immediately");
//!
//! let order: Vec<_> = timeline.cues().iter().map(|c| c.action).collect();
//! assert_eq!(order, ["immediately", "first", "second"]);
//! ```
//!
//! # Invariants
//!
//! 1. Cues are always sorted by offset (maintained on insertion).
//! 2. Cues sharing an offset keep insertion order.
//! 3. `duration()` is the largest offset (zero when empty).

use std::time::Duration;

/// A single scheduled action.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue<A> {
    /// When this cue fires, relative to the timeline start.
    pub offset: Duration,
    /// What to do when it fires.
    pub action: A,
}

/// An ordered sequence of cues.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<A> {
    cues: Vec<Cue<A>>,
}

impl<A> Timeline<A> {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self { cues: Vec::new() }
    }

    /// Add a cue at an absolute offset (builder pattern).
    #[must_use]
    pub fn add(mut self, offset: Duration, action: A) -> Self {
        self.push(offset, action);
        self
    }

    /// Add a cue `delay` after the latest cue so far (builder pattern).
    ///
    /// On an empty timeline the delay is measured from zero.
    #[must_use]
    pub fn then(self, delay: Duration, action: A) -> Self {
        let base = self.duration();
        self.add(base.saturating_add(delay), action)
    }

    /// Add `count` cues starting at `start`, `interval` apart (builder pattern).
    #[must_use]
    pub fn stagger(
        mut self,
        start: Duration,
        interval: Duration,
        count: usize,
        mut make: impl FnMut(usize) -> A,
    ) -> Self {
        let mut offset = start;
        for i in 0..count {
            self.push(offset, make(i));
            offset = offset.saturating_add(interval);
        }
        self
    }

    /// Insert a cue maintaining sort order by offset.
    pub fn push(&mut self, offset: Duration, action: A) {
        // Stable: equal offsets keep insertion order.
        let pos = self.cues.partition_point(|c| c.offset <= offset);
        self.cues.insert(pos, Cue { offset, action });
    }

    /// All cues in firing order.
    #[inline]
    #[must_use]
    pub fn cues(&self) -> &[Cue<A>] {
        &self.cues
    }

    /// Consume the timeline, yielding cues in firing order.
    #[must_use]
    pub fn into_cues(self) -> Vec<Cue<A>> {
        self.cues
    }

    /// Offset of the last cue.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.cues.last().map_or(Duration::ZERO, |c| c.offset)
    }

    /// Number of cues.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the timeline has no cues.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);

    #[test]
    fn empty_timeline() {
        let tl: Timeline<u8> = Timeline::new();
        assert!(tl.is_empty());
        assert_eq!(tl.duration(), Duration::ZERO);
    }

    #[test]
    fn insertion_keeps_offset_order() {
        let tl = Timeline::new().add(MS_200, 'b').add(MS_100, 'a').add(MS_200, 'c');
        let order: Vec<char> = tl.cues().iter().map(|c| c.action).collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
        assert_eq!(tl.duration(), MS_200);
    }

    #[test]
    fn then_chains_after_latest() {
        let tl = Timeline::new().then(MS_100, 1).then(MS_100, 2).add(Duration::ZERO, 0);
        let offsets: Vec<_> = tl.cues().iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![Duration::ZERO, MS_100, MS_200]);
    }

    #[test]
    fn stagger_spaces_cues() {
        let tl = Timeline::new().stagger(Duration::from_millis(300), Duration::from_millis(345), 5, |i| i);
        let offsets: Vec<u64> = tl.cues().iter().map(|c| c.offset.as_millis() as u64).collect();
        assert_eq!(offsets, vec![300, 645, 990, 1335, 1680]);
        assert_eq!(tl.len(), 5);
    }

    #[test]
    fn into_cues_preserves_order() {
        let cues = Timeline::new().add(MS_200, "late").add(MS_100, "early").into_cues();
        assert_eq!(cues[0].action, "early");
        assert_eq!(cues[1].offset, MS_200);
    }
}
