// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: geometry, easing, and morph-target primitives for view transitions.
//!
//! # Role in segue
//! `segue-core` is the framework-independent layer. It knows nothing about
//! the DOM, timers, or storage; it owns the value types those layers pass
//! around and the pure math that turns two measured rectangles into a
//! morph.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Rect`], [`geometry::GeometrySnapshot`], viewport sizing.
//! - **Animation**: the [`animation::Animation`] trait, easing curves
//!   (including the cubic-bezier morph curve), tweens, and cue timelines.
//! - **Typography**: list-card ↔ detail-header style interpolation.
//! - **Measurement**: the [`measure::MeasurementProvider`] seam and element handles.
//! - **Morph**: [`morph::compute_morph_target`] and target resolution with fallbacks.
//!
//! # How it fits in the system
//! The runtime (`segue-runtime`) drives these primitives from a
//! deterministic scheduler and persists snapshots through session storage.

pub mod animation;
pub mod content;
pub mod geometry;
pub mod logging;
pub mod measure;
pub mod morph;
pub mod typography;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
