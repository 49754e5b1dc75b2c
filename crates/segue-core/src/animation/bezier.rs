#![forbid(unsafe_code)]

//! CSS `cubic-bezier(x1, y1, x2, y2)` timing curves.
//!
//! The curve runs from `(0, 0)` to `(1, 1)` with two control points. Given a
//! time fraction `x`, we solve for the curve parameter `s` with `bx(s) = x`
//! (Newton-Raphson, falling back to bisection when the slope vanishes) and
//! return `by(s)`.

/// The morph curve: a slow start, a fast middle, and a long settle.
pub const MORPH_EASING: CubicBezier = CubicBezier {
    x1: 0.43,
    y1: 0.13,
    x2: 0.23,
    y2: 0.96,
};

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f64 = 1e-6;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f64 = 1e-7;

/// A cubic-bezier easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    /// Create a curve. `x1` and `x2` are clamped to `[0, 1]` so the curve
    /// stays a function of time.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    /// Control points as `(x1, y1, x2, y2)`.
    pub const fn points(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Eased value at time fraction `t`.
    pub fn sample(&self, t: f32) -> f32 {
        let x = f64::from(t.clamp(0.0, 1.0));
        if x == 0.0 || x == 1.0 {
            return x as f32;
        }
        let s = self.solve_parameter(x);
        Self::component(s, self.y1, self.y2) as f32
    }

    #[inline]
    fn component(s: f64, p1: f64, p2: f64) -> f64 {
        // B(s) = 3(1-s)^2 s p1 + 3(1-s) s^2 p2 + s^3
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }

    #[inline]
    fn derivative(s: f64, p1: f64, p2: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    fn solve_parameter(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::component(s, self.x1, self.x2) - x;
            if err.abs() < EPSILON {
                return s;
            }
            let slope = Self::derivative(s, self.x1, self.x2);
            if slope.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            s -= err / slope;
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let val = Self::component(s, self.x1, self.x2);
            if (val - x).abs() < EPSILON {
                break;
            }
            if val < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(MORPH_EASING.sample(0.0), 0.0);
        assert_eq!(MORPH_EASING.sample(1.0), 1.0);
    }

    #[test]
    fn linear_control_points_are_identity() {
        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert!((linear.sample(t) - t).abs() < 1e-4, "t={t}");
        }
    }

    #[test]
    fn morph_curve_is_monotonic() {
        let mut prev = 0.0f32;
        for i in 0..=200 {
            let v = MORPH_EASING.sample(i as f32 / 200.0);
            assert!(v >= prev - 1e-5, "non-monotonic at {i}");
            prev = v;
        }
    }

    #[test]
    fn morph_curve_starts_slow() {
        // Slow start: at 10% of the time, about 5% of the distance.
        assert!(MORPH_EASING.sample(0.1) < 0.07);
        // Long settle: at 80% of the time, over 95% of the distance.
        assert!(MORPH_EASING.sample(0.8) > 0.95);
        assert!((MORPH_EASING.sample(0.5) - 0.7596).abs() < 1e-3);
    }

    #[test]
    fn x_control_points_are_clamped() {
        let c = CubicBezier::new(-1.0, 0.0, 2.0, 1.0);
        assert_eq!(c.points(), (0.0, 0.0, 1.0, 1.0));
    }
}
