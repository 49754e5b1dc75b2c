#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! Everything here is driven by explicit `tick(dt)` calls; nothing reads a
//! wall clock. That keeps every animation reproducible under a fake clock.
//!
//! - [`Animation`]: the shared progress contract.
//! - Easing functions ([`linear`], [`ease_in`], [`ease_out`], [`ease_in_out`])
//!   and [`CubicBezier`] for CSS-style timing curves.
//! - [`Tween`]: a single eased 0→1 progression.
//! - [`Timeline`]: an ordered list of `(offset, action)` cues.

mod bezier;
mod timeline;
mod tween;

use std::time::Duration;

pub use bezier::{CubicBezier, MORPH_EASING};
pub use timeline::{Cue, Timeline};
pub use tween::{Easing, Tween};

/// A time-driven animation producing a progress value.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current eased value, nominally in `[0.0, 1.0]`.
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);

    /// Time past completion carried by the last tick.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

/// Plain easing function signature.
pub type EasingFn = fn(f32) -> f32;

/// Identity easing.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in.
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f32) -> f64 {
    a + (b - a) * f64::from(t)
}
