#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are CSS pixels relative to the viewport's top-left corner, as
//! reported by a layout pass. Values are `f64` because measured layouts are
//! fractional.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A measured rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether this looks like a real post-layout measurement.
    ///
    /// A rectangle read before the layout pass completes is all zeros; one
    /// read from a detached element may carry NaN.
    #[inline]
    pub fn is_measured(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && !self.is_empty()
    }

    /// Shift the rectangle by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            top: self.top + dy,
            left: self.left + dx,
            ..*self
        }
    }

    /// Move the top-left corner up and left by `amount` on both axes.
    ///
    /// Size is unchanged.
    #[inline]
    #[must_use]
    pub fn pull_in(&self, amount: f64) -> Rect {
        self.translate(-amount, -amount)
    }

    /// Offset of this rectangle's top-left corner from `anchor`'s.
    #[inline]
    pub fn offset_from(&self, anchor: &Rect) -> Offset {
        Offset {
            top: self.top - anchor.top,
            left: self.left - anchor.left,
        }
    }

    /// Place a rectangle of this size at `anchor + offset`.
    #[inline]
    #[must_use]
    pub fn placed_at(&self, anchor: &Rect, offset: Offset) -> Rect {
        Rect {
            top: anchor.top + offset.top,
            left: anchor.left + offset.left,
            ..*self
        }
    }
}

/// A top/left displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offset {
    /// Vertical displacement.
    pub top: f64,
    /// Horizontal displacement.
    pub left: f64,
}

impl Offset {
    /// Create a new offset.
    #[inline]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Visible viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Last-measured layout of a detail-view header.
///
/// Written by the detail view once layout settles; read by the list view
/// when it computes a morph target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GeometrySnapshot {
    /// Top edge of the header.
    pub top: f64,
    /// Left edge of the header.
    pub left: f64,
    /// Width of the header container.
    pub width: f64,
    /// Height of the header title line.
    pub height: f64,
    /// Header position relative to the stable anchor (the back link), if
    /// the anchor was present at capture time.
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset_from_anchor: Option<Offset>,
}

impl GeometrySnapshot {
    /// Build a snapshot from a measured header and an optional anchor.
    pub fn capture(header: Rect, anchor: Option<Rect>) -> Self {
        Self {
            top: header.top,
            left: header.left,
            width: header.width,
            height: header.height,
            offset_from_anchor: anchor.map(|a| header.offset_from(&a)),
        }
    }

    /// The captured header rectangle in absolute viewport coordinates.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.top, self.left, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(r.right(), 120.0);
        assert_eq!(r.bottom(), 50.0);
        assert!(!r.is_empty());
    }

    #[test]
    fn zero_rect_is_not_measured() {
        assert!(!Rect::default().is_measured());
        assert!(!Rect::new(f64::NAN, 0.0, 10.0, 10.0).is_measured());
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).is_measured());
    }

    #[test]
    fn pull_in_moves_corner_only() {
        let r = Rect::new(84.0, 32.0, 896.0, 60.0).pull_in(17.0);
        assert_eq!(r, Rect::new(67.0, 15.0, 896.0, 60.0));
    }

    #[test]
    fn offset_and_place_are_inverse() {
        let anchor = Rect::new(32.0, 32.0, 50.0, 20.0);
        let header = Rect::new(84.0, 190.0, 896.0, 60.0);
        let off = header.offset_from(&anchor);
        assert_eq!(off, Offset::new(52.0, 158.0));
        assert_eq!(header.placed_at(&anchor, off), header);

        let moved = Rect::new(40.0, 10.0, 50.0, 20.0);
        let placed = header.placed_at(&moved, off);
        assert_eq!(placed.top, 92.0);
        assert_eq!(placed.left, 168.0);
        assert_eq!(placed.width, 896.0);
    }

    #[test]
    fn snapshot_capture_records_anchor_offset() {
        let header = Rect::new(84.0, 192.0, 896.0, 60.0);
        let anchor = Rect::new(32.0, 32.0, 48.0, 20.0);
        let snap = GeometrySnapshot::capture(header, Some(anchor));
        assert_eq!(snap.rect(), header);
        assert_eq!(snap.offset_from_anchor, Some(Offset::new(52.0, 160.0)));

        let bare = GeometrySnapshot::capture(header, None);
        assert_eq!(bare.offset_from_anchor, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_json_uses_camel_case() {
        let snap = GeometrySnapshot::capture(
            Rect::new(1.0, 2.0, 3.0, 4.0),
            Some(Rect::new(0.0, 0.0, 1.0, 1.0)),
        );
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"offsetFromAnchor\""), "{json}");
    }
}
