#![forbid(unsafe_code)]

//! Element measurement seam.
//!
//! The choreographer never touches a DOM. It names the elements it cares
//! about with [`ElementHandle`]s and asks a [`MeasurementProvider`] for
//! their rectangles. A browser host implements the trait over
//! `getBoundingClientRect`; a host that measures in batches can push
//! results into a [`LayoutMap`] instead.

use std::collections::HashMap;
use std::fmt;

use crate::content::{ContentKind, ContentRef};
use crate::geometry::Rect;

/// A stable name for a measurable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementHandle {
    /// A clickable card in a list page.
    Card(ContentRef),
    /// The header block of a detail page.
    DetailHeader(ContentKind),
    /// The persistent back link on a detail page; used as the anchor for
    /// anchor-relative positioning.
    BackAnchor(ContentKind),
    /// Any other element, by host-defined id.
    Custom(String),
}

impl ElementHandle {
    /// Handle for a list card.
    pub fn card(content: &ContentRef) -> Self {
        Self::Card(content.clone())
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card(c) => write!(f, "card[{c}]"),
            Self::DetailHeader(k) => write!(f, "{k}-header"),
            Self::BackAnchor(k) => write!(f, "{k}-back"),
            Self::Custom(id) => write!(f, "#{id}"),
        }
    }
}

/// Reads the current on-screen rectangle of an element.
pub trait MeasurementProvider {
    /// Measure `element`, or `None` if it is not currently rendered.
    fn measure(&self, element: &ElementHandle) -> Option<Rect>;
}

impl<M: MeasurementProvider + ?Sized> MeasurementProvider for &M {
    fn measure(&self, element: &ElementHandle) -> Option<Rect> {
        (**self).measure(element)
    }
}

/// A measurement provider backed by a map of pushed rectangles.
#[derive(Debug, Clone, Default)]
pub struct LayoutMap {
    rects: HashMap<ElementHandle, Rect>,
}

impl LayoutMap {
    /// Create an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rectangle for an element (builder pattern).
    #[must_use]
    pub fn with(mut self, element: ElementHandle, rect: Rect) -> Self {
        self.set(element, rect);
        self
    }

    /// Record or replace a rectangle.
    pub fn set(&mut self, element: ElementHandle, rect: Rect) {
        self.rects.insert(element, rect);
    }

    /// Forget an element (it unmounted).
    pub fn remove(&mut self, element: &ElementHandle) -> Option<Rect> {
        self.rects.remove(element)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

impl MeasurementProvider for LayoutMap {
    fn measure(&self, element: &ElementHandle) -> Option<Rect> {
        self.rects.get(element).copied()
    }
}
