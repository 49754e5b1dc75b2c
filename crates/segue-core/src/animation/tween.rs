#![forbid(unsafe_code)]

//! A single eased 0→1 progression over a fixed duration.

use std::time::Duration;

use super::{Animation, CubicBezier, EasingFn, linear};

/// Easing selection for a [`Tween`].
#[derive(Debug, Clone, Copy)]
pub enum Easing {
    /// A plain function such as [`super::ease_out`].
    Fn(EasingFn),
    /// A CSS cubic-bezier curve.
    Bezier(CubicBezier),
}

impl Easing {
    /// Apply the curve to a raw time fraction.
    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Self::Fn(f) => f(t),
            Self::Bezier(curve) => curve.sample(t),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::Fn(linear)
    }
}

/// Eased progress from 0.0 to 1.0 over `duration`.
///
/// A zero duration is complete immediately and reports 1.0.
#[derive(Debug, Clone)]
pub struct Tween {
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    /// Create a linear tween.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Jump to an absolute elapsed time (clamped to the duration).
    pub fn seek(&mut self, elapsed: Duration) {
        self.elapsed = elapsed.min(self.duration);
    }

    /// Raw (un-eased) time fraction.
    #[must_use]
    pub fn raw_progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    /// Configured duration.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Elapsed time, never past the duration.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        self.easing.apply(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
