#![forbid(unsafe_code)]

//! Header typography and its interpolation.
//!
//! A list card and a detail header show the same three elements (title,
//! status badge, description) at different sizes. During a morph the card's
//! typography is interpolated toward the header's so the text appears to
//! grow in place rather than snap.

use crate::animation::lerp;

/// Box padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Padding {
    /// Create a padding value.
    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Style overrides for the text elements inside a morphing item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderTypography {
    /// Title font size.
    pub title_px: f64,
    /// Description font size.
    pub description_px: f64,
    /// Status badge padding.
    pub badge_padding: Padding,
}

impl HeaderTypography {
    /// Typography of an item as rendered in a list.
    pub const LIST_CARD: Self = Self {
        title_px: 24.0,
        description_px: 16.0,
        badge_padding: Padding::new(8.0, 4.0),
    };

    /// Typography of the detail page header.
    pub const DETAIL_HEADER: Self = Self {
        title_px: 60.0,
        description_px: 20.0,
        badge_padding: Padding::new(12.0, 6.0),
    };

    /// Interpolate from `self` toward `to` at eased progress `t`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            title_px: lerp(self.title_px, to.title_px, t),
            description_px: lerp(self.description_px, to.description_px, t),
            badge_padding: Padding {
                horizontal: lerp(self.badge_padding.horizontal, to.badge_padding.horizontal, t),
                vertical: lerp(self.badge_padding.vertical, to.badge_padding.vertical, t),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        let from = HeaderTypography::LIST_CARD;
        let to = HeaderTypography::DETAIL_HEADER;
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0), to);
    }

    #[test]
    fn midpoint() {
        let mid = HeaderTypography::LIST_CARD.lerp(&HeaderTypography::DETAIL_HEADER, 0.5);
        assert_eq!(mid.title_px, 42.0);
        assert_eq!(mid.description_px, 18.0);
        assert_eq!(mid.badge_padding, Padding::new(10.0, 5.0));
    }

    #[test]
    fn reverse_direction() {
        let back = HeaderTypography::DETAIL_HEADER.lerp(&HeaderTypography::LIST_CARD, 0.25);
        assert_eq!(back.title_px, 51.0);
    }
}
