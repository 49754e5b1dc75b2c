#![forbid(unsafe_code)]

//! Monotonic clocks.
//!
//! The runtime never sleeps or reads time on its own. Hosts either feed
//! elapsed time directly into `advance(dt)` calls or read a [`Clock`] and
//! pass the difference along. Tests use [`DeterministicClock`].

use std::time::Duration;

/// A monotonic time source.
pub trait Clock {
    /// Time since the clock's origin.
    fn now(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Wall-clock monotonic time (works on `wasm32` via `web-time`).
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    /// Start a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Converts successive clock readings into `dt` steps.
#[derive(Debug, Clone)]
pub struct FrameStepper<C> {
    clock: C,
    last: Duration,
}

impl<C: Clock> FrameStepper<C> {
    /// Wrap `clock`, starting from its current reading.
    pub fn new(clock: C) -> Self {
        let last = clock.now();
        Self { clock, last }
    }

    /// Time elapsed since the previous call. Never negative.
    pub fn step(&mut self) -> Duration {
        let now = self.clock.now();
        let dt = now.saturating_sub(self.last);
        self.last = now.max(self.last);
        dt
    }

    /// Access the wrapped clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
