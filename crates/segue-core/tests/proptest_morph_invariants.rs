#![forbid(unsafe_code)]

//! Property tests for the morph calculator.
//!
//! Validates:
//! - The delta formula holds for arbitrary finite rectangles and padding.
//! - Computation is pure (repeat calls agree exactly).
//! - Applying the full transform lands the source on the padded target.
//! - Target resolution never panics and always yields a provenance.

use proptest::prelude::*;

use segue_core::geometry::{GeometrySnapshot, Rect, Viewport};
use segue_core::morph::{MorphPolicy, TargetResolution, TargetSource, compute_morph_target};

fn coord() -> impl Strategy<Value = f64> {
    -4000.0f64..4000.0
}

fn size() -> impl Strategy<Value = f64> {
    1.0f64..3000.0
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (coord(), coord(), size(), size()).prop_map(|(t, l, w, h)| Rect::new(t, l, w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn delta_matches_formula(
        source in rect_strategy(),
        target in rect_strategy(),
        padding in 0.0f64..64.0,
    ) {
        let m = compute_morph_target(&source, &target, padding);
        prop_assert_eq!(m.dx, (target.left - padding) - source.left);
        prop_assert_eq!(m.dy, (target.top - padding) - source.top);
        prop_assert_eq!(m.target_width, target.width);
    }

    #[test]
    fn computation_is_pure(
        source in rect_strategy(),
        target in rect_strategy(),
        padding in 0.0f64..64.0,
    ) {
        let a = compute_morph_target(&source, &target, padding);
        let b = compute_morph_target(&source, &target, padding);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn full_transform_lands_on_padded_target(
        source in rect_strategy(),
        target in rect_strategy(),
        padding in 0.0f64..64.0,
    ) {
        let m = compute_morph_target(&source, &target, padding);
        let t = m.at(source.width, 1.0);
        prop_assert!((source.left + t.translate_x - (target.left - padding)).abs() < 1e-6);
        prop_assert!((source.top + t.translate_y - (target.top - padding)).abs() < 1e-6);
        prop_assert!((t.width - target.width).abs() < 1e-6);
    }

    #[test]
    fn resolution_always_has_provenance(
        header in rect_strategy(),
        anchor in proptest::option::of(rect_strategy()),
        capture_anchor in proptest::option::of(rect_strategy()),
        has_snapshot in any::<bool>(),
        anchored in any::<bool>(),
        width in 0.0f64..4000.0,
    ) {
        let policy = MorphPolicy {
            resolution: if anchored { TargetResolution::AnchorRelative } else { TargetResolution::Absolute },
            ..MorphPolicy::default()
        };
        let snap = GeometrySnapshot::capture(header, capture_anchor);
        let resolved = policy.resolve_target(
            has_snapshot.then_some(&snap),
            anchor,
            Viewport::new(width, 800.0),
        );
        match resolved.source {
            TargetSource::Fallback => {
                prop_assert!(!has_snapshot);
                prop_assert!(resolved.rect.width <= policy.fallback.max_width);
                prop_assert!(resolved.rect.width >= 0.0);
            }
            TargetSource::Snapshot => {
                prop_assert!(has_snapshot);
                prop_assert_eq!(resolved.rect, header);
            }
            TargetSource::Anchored => {
                prop_assert!(has_snapshot && anchored && anchor.is_some() && capture_anchor.is_some());
                prop_assert_eq!(resolved.rect.width, header.width);
            }
        }
    }
}
