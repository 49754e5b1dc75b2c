#![forbid(unsafe_code)]

//! Morph target calculation.
//!
//! A morph moves a list card from where it is to where the destination
//! header will be. The only inputs are two rectangles; the output is the
//! translation and width the card must animate to.
//!
//! # Formula
//!
//! With `p` the padding adjustment (the card's border/padding inset
//! relative to the header box):
//!
//! ```text
//! dx          = (target.left - p) - source.left
//! dy          = (target.top  - p) - source.top
//! targetWidth = target.width
//! ```
//!
//! # Target resolution
//!
//! The target comes from a stored [`GeometrySnapshot`] when one exists.
//! With [`TargetResolution::AnchorRelative`] it is re-placed relative to the
//! live anchor element so page scroll does not skew it. A missing anchor
//! degrades to the absolute coordinates; a missing snapshot degrades to
//! [`FallbackGeometry`]. None of these cases is an error.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::animation::lerp;
use crate::content::ContentRef;
use crate::geometry::{GeometrySnapshot, Rect, Viewport};
use crate::measure::{ElementHandle, MeasurementProvider};

/// Default inset between a clickable card and the destination header box.
///
/// One pixel of border plus a 16px padding.
pub const DEFAULT_PADDING_ADJUSTMENT: f64 = 17.0;

/// Translation and width a morphing element animates toward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MorphTarget {
    /// Horizontal translation.
    pub dx: f64,
    /// Vertical translation.
    pub dy: f64,
    /// Final width.
    pub target_width: f64,
}

impl MorphTarget {
    /// A morph that leaves the element where it is.
    #[must_use]
    pub const fn stationary(width: f64) -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            target_width: width,
        }
    }

    /// Whether the element actually moves.
    #[must_use]
    pub fn moves(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }

    /// Interpolated transform at eased progress `t`, starting from an
    /// element of `from_width`.
    #[must_use]
    pub fn at(&self, from_width: f64, t: f32) -> Transform {
        Transform {
            translate_x: lerp(0.0, self.dx, t),
            translate_y: lerp(0.0, self.dy, t),
            width: lerp(from_width, self.target_width, t),
        }
    }
}

/// A concrete transform override applied to an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub width: f64,
}

/// Compute the delta that moves `source` onto `target`.
///
/// Pure: the same inputs always give the same output.
#[must_use]
pub fn compute_morph_target(source: &Rect, target: &Rect, padding_adjustment: f64) -> MorphTarget {
    let adjusted = target.pull_in(padding_adjustment);
    MorphTarget {
        dx: adjusted.left - source.left,
        dy: adjusted.top - source.top,
        target_width: target.width,
    }
}

/// How a stored snapshot is turned into a target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TargetResolution {
    /// Use the snapshot's viewport coordinates as recorded.
    Absolute,
    /// Re-place the snapshot relative to the live anchor element.
    #[default]
    AnchorRelative,
}

/// Where a resolved target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    /// Snapshot coordinates, as recorded.
    Snapshot,
    /// Snapshot offset applied to the live anchor.
    Anchored,
    /// No snapshot; fixed fallback geometry.
    Fallback,
}

impl TargetSource {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Anchored => "anchored",
            Self::Fallback => "fallback",
        }
    }
}

/// Estimated header placement used when nothing was measured yet.
///
/// The header sits at a fixed top/left offset and spans the viewport minus
/// its horizontal margins, capped at `max_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackGeometry {
    pub top: f64,
    pub left: f64,
    pub max_width: f64,
    /// Total horizontal margin subtracted from the viewport width.
    pub margin: f64,
    pub height: f64,
}

impl FallbackGeometry {
    /// Layout of the detail page: 32px page padding, a 20px back link with
    /// a 32px gap below it, a 60px title line, and a 896px column.
    pub const DEFAULT: Self = Self {
        top: 84.0,
        left: 32.0,
        max_width: 896.0,
        margin: 64.0,
        height: 60.0,
    };

    /// Fallback rectangle for `viewport`.
    #[must_use]
    pub fn rect(&self, viewport: Viewport) -> Rect {
        let width = (viewport.width - self.margin).clamp(0.0, self.max_width);
        Rect::new(self.top, self.left, width, self.height)
    }
}

impl Default for FallbackGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A resolved target rectangle and its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTarget {
    pub rect: Rect,
    pub source: TargetSource,
}

/// Everything needed to turn measurements into a morph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphPolicy {
    pub padding_adjustment: f64,
    pub resolution: TargetResolution,
    pub fallback: FallbackGeometry,
}

impl Default for MorphPolicy {
    fn default() -> Self {
        Self {
            padding_adjustment: DEFAULT_PADDING_ADJUSTMENT,
            resolution: TargetResolution::default(),
            fallback: FallbackGeometry::DEFAULT,
        }
    }
}

/// Result of measuring a card and computing its morph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphPlan {
    /// The card's rectangle at click time.
    pub source: Rect,
    /// Where the card ends up.
    pub target: ResolvedTarget,
    /// The computed delta.
    pub morph: MorphTarget,
}

impl MorphPolicy {
    /// Resolve the target rectangle from an optional snapshot.
    ///
    /// `anchor` is the live anchor rectangle, if the anchor is rendered.
    #[must_use]
    pub fn resolve_target(
        &self,
        snapshot: Option<&GeometrySnapshot>,
        anchor: Option<Rect>,
        viewport: Viewport,
    ) -> ResolvedTarget {
        let Some(snapshot) = snapshot else {
            return ResolvedTarget {
                rect: self.fallback.rect(viewport),
                source: TargetSource::Fallback,
            };
        };

        let stored = snapshot.rect();
        if self.resolution == TargetResolution::AnchorRelative {
            match (anchor, snapshot.offset_from_anchor) {
                (Some(anchor), Some(offset)) => {
                    return ResolvedTarget {
                        rect: stored.placed_at(&anchor, offset),
                        source: TargetSource::Anchored,
                    };
                }
                _ => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        target: "segue.morph",
                        anchor_present = anchor.is_some(),
                        "anchor-relative target unavailable, using absolute coordinates"
                    );
                }
            }
        }

        ResolvedTarget {
            rect: stored,
            source: TargetSource::Snapshot,
        }
    }

    /// Compute the morph from a known source rectangle.
    #[must_use]
    pub fn plan(
        &self,
        source: Rect,
        snapshot: Option<&GeometrySnapshot>,
        anchor: Option<Rect>,
        viewport: Viewport,
    ) -> MorphPlan {
        let target = self.resolve_target(snapshot, anchor, viewport);
        let morph = compute_morph_target(&source, &target.rect, self.padding_adjustment);
        MorphPlan {
            source,
            target,
            morph,
        }
    }

    /// Measure the card for `content` (and the anchor, when needed) and
    /// compute its morph.
    ///
    /// Returns `None` only when the card itself cannot be measured; there is
    /// nothing to animate in that case.
    pub fn measure_and_plan<M: MeasurementProvider>(
        &self,
        provider: &M,
        content: &ContentRef,
        snapshot: Option<&GeometrySnapshot>,
        viewport: Viewport,
    ) -> Option<MorphPlan> {
        let source = provider
            .measure(&ElementHandle::card(content))
            .filter(Rect::is_measured)?;
        let anchor = match self.resolution {
            TargetResolution::AnchorRelative => provider
                .measure(&ElementHandle::BackAnchor(content.kind))
                .filter(Rect::is_measured),
            TargetResolution::Absolute => None,
        };
        let plan = self.plan(source, snapshot, anchor, viewport);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "segue.morph",
            content = %content,
            source = plan.target.source.as_str(),
            dx = plan.morph.dx,
            dy = plan.morph.dy,
            target_width = plan.morph.target_width,
            "morph target computed"
        );

        Some(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentKind;
    use crate::geometry::Offset;
    use crate::measure::LayoutMap;

    fn card() -> Rect {
        Rect::new(300.0, 200.0, 600.0, 120.0)
    }

    fn header() -> Rect {
        Rect::new(84.0, 192.0, 896.0, 60.0)
    }

    #[test]
    fn formula_subtracts_padding_from_target() {
        let m = compute_morph_target(&card(), &header(), 17.0);
        assert_eq!(m.dx, 192.0 - 17.0 - 200.0);
        assert_eq!(m.dy, 84.0 - 17.0 - 300.0);
        assert_eq!(m.target_width, 896.0);
    }

    #[test]
    fn zero_padding_is_plain_delta() {
        let m = compute_morph_target(&card(), &header(), 0.0);
        assert_eq!((m.dx, m.dy), (-8.0, -216.0));
    }

    #[test]
    fn stationary_does_not_move() {
        let m = MorphTarget::stationary(600.0);
        assert!(!m.moves());
        assert_eq!(m.at(600.0, 1.0), Transform { translate_x: 0.0, translate_y: 0.0, width: 600.0 });
    }

    #[test]
    fn transform_interpolates() {
        let m = MorphTarget { dx: -100.0, dy: -200.0, target_width: 900.0 };
        let t = m.at(600.0, 0.5);
        assert_eq!(t.translate_x, -50.0);
        assert_eq!(t.translate_y, -100.0);
        assert_eq!(t.width, 750.0);
    }

    #[test]
    fn missing_snapshot_uses_fallback() {
        let policy = MorphPolicy::default();
        let resolved = policy.resolve_target(None, None, Viewport::new(1280.0, 800.0));
        assert_eq!(resolved.source, TargetSource::Fallback);
        assert_eq!(resolved.rect, Rect::new(84.0, 32.0, 896.0, 60.0));
    }

    #[test]
    fn fallback_width_is_viewport_capped() {
        let narrow = FallbackGeometry::DEFAULT.rect(Viewport::new(400.0, 800.0));
        assert_eq!(narrow.width, 336.0);
        let tiny = FallbackGeometry::DEFAULT.rect(Viewport::new(10.0, 800.0));
        assert_eq!(tiny.width, 0.0);
    }

    #[test]
    fn anchor_relative_uses_live_anchor() {
        let policy = MorphPolicy::default();
        let snap = GeometrySnapshot {
            top: 84.0,
            left: 192.0,
            width: 896.0,
            height: 60.0,
            offset_from_anchor: Some(Offset::new(52.0, 160.0)),
        };
        // Page scrolled: the anchor moved up by 100px.
        let anchor = Rect::new(-68.0, 32.0, 48.0, 20.0);
        let resolved = policy.resolve_target(Some(&snap), Some(anchor), Viewport::default());
        assert_eq!(resolved.source, TargetSource::Anchored);
        assert_eq!(resolved.rect.top, -16.0);
        assert_eq!(resolved.rect.left, 192.0);
    }

    #[test]
    fn anchor_relative_without_anchor_falls_back_to_absolute() {
        let policy = MorphPolicy::default();
        let snap = GeometrySnapshot::capture(header(), Some(Rect::new(32.0, 32.0, 48.0, 20.0)));
        let resolved = policy.resolve_target(Some(&snap), None, Viewport::default());
        assert_eq!(resolved.source, TargetSource::Snapshot);
        assert_eq!(resolved.rect, header());
    }

    #[test]
    fn absolute_ignores_anchor() {
        let policy = MorphPolicy {
            resolution: TargetResolution::Absolute,
            ..MorphPolicy::default()
        };
        let snap = GeometrySnapshot::capture(header(), Some(Rect::new(32.0, 32.0, 48.0, 20.0)));
        let resolved = policy.resolve_target(Some(&snap), Some(Rect::new(0.0, 0.0, 1.0, 1.0)), Viewport::default());
        assert_eq!(resolved.source, TargetSource::Snapshot);
        assert_eq!(resolved.rect, header());
    }

    #[test]
    fn measure_and_plan_requires_measured_card() {
        let content = ContentRef::project("nba-90ers");
        let policy = MorphPolicy::default();

        let empty = LayoutMap::new();
        assert!(policy.measure_and_plan(&empty, &content, None, Viewport::default()).is_none());

        let unpainted = LayoutMap::new().with(ElementHandle::card(&content), Rect::default());
        assert!(policy.measure_and_plan(&unpainted, &content, None, Viewport::default()).is_none());

        let layout = LayoutMap::new()
            .with(ElementHandle::card(&content), card())
            .with(ElementHandle::BackAnchor(ContentKind::Project), Rect::new(32.0, 32.0, 48.0, 20.0));
        let snap = GeometrySnapshot::capture(header(), Some(Rect::new(32.0, 32.0, 48.0, 20.0)));
        let plan = policy
            .measure_and_plan(&layout, &content, Some(&snap), Viewport::default())
            .unwrap();
        assert_eq!(plan.target.source, TargetSource::Anchored);
        assert_eq!(plan.morph, compute_morph_target(&card(), &header(), 17.0));
    }
}
