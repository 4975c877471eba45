use crate::color::Color;

/// Changes smaller than this print as `0.00` and are reported as no change.
pub const DEFAULT_TOLERANCE: f64 = 0.005;

// Luma weights scaled by 1000 so the weighted sum stays in integers.
const WEIGHT_R: u32 = 299;
const WEIGHT_G: u32 = 587;
const WEIGHT_B: u32 = 114;

/// Perceptual brightness of a shade: `0.299 R + 0.587 G + 0.114 B`.
///
/// Green is weighted highest, blue least. The result lies in [0, 255].
pub fn brightness(color: Color) -> f64 {
    let sum =
        WEIGHT_R * color.r as u32 + WEIGHT_G * color.g as u32 + WEIGHT_B * color.b as u32;
    sum as f64 / 1000.0
}

/// Signed brightness change going from `from` to `to`.
///
/// Positive means `to` is lighter, negative means darker.
pub fn compare(from: Color, to: Color) -> f64 {
    brightness(to) - brightness(from)
}

/// Direction of a brightness change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Whiter,
    Darker,
    NoChange,
}

impl Trend {
    /// Classify `change`; anything strictly inside `±tolerance` is `NoChange`.
    pub fn classify(change: f64, tolerance: f64) -> Self {
        if change.abs() < tolerance || change == 0.0 {
            Trend::NoChange
        } else if change > 0.0 {
            Trend::Whiter
        } else {
            Trend::Darker
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Whiter => "getting whiter",
            Trend::Darker => "getting darker",
            Trend::NoChange => "no significant change",
        }
    }

    /// The sentence printed under the progress line.
    pub fn message(self) -> &'static str {
        match self {
            Trend::Whiter => "Your teeth appear to be getting whiter!",
            Trend::Darker => "Your teeth appear to be getting darker.",
            Trend::NoChange => "No significant change in tooth shade.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn brightness_boundaries() {
        assert_eq!(brightness(Color::new(255, 255, 255)), 255.0);
        assert_eq!(brightness(Color::new(0, 0, 0)), 0.0);
    }

    #[test]
    fn green_weighs_most() {
        let r = brightness(Color::new(100, 0, 0));
        let g = brightness(Color::new(0, 100, 0));
        let b = brightness(Color::new(0, 0, 100));
        assert!(g > r && r > b, "expected g > r > b, got {g} {r} {b}");
    }

    #[test]
    fn lighter_shade_is_positive() {
        let change = compare(Color::new(200, 190, 180), Color::new(210, 205, 195));
        assert!((change - 13.505).abs() < 1e-9, "got {change}");
        assert_eq!(Trend::classify(change, DEFAULT_TOLERANCE), Trend::Whiter);
    }

    #[test]
    fn gray_drop_is_exactly_fifty() {
        let change = compare(Color::new(150, 150, 150), Color::new(100, 100, 100));
        assert_eq!(change, -50.0);
        assert_eq!(Trend::classify(change, DEFAULT_TOLERANCE), Trend::Darker);
    }

    #[test]
    fn fallback_against_fallback_is_no_change() {
        let shade = crate::color::FALLBACK_SHADE;
        let change = compare(shade, shade);
        assert_eq!(change, 0.0);
        assert_eq!(Trend::classify(change, DEFAULT_TOLERANCE), Trend::NoChange);
    }

    #[test]
    fn classify_respects_tolerance() {
        assert_eq!(Trend::classify(0.004, DEFAULT_TOLERANCE), Trend::NoChange);
        assert_eq!(Trend::classify(-0.004, DEFAULT_TOLERANCE), Trend::NoChange);
        assert_eq!(Trend::classify(0.005, DEFAULT_TOLERANCE), Trend::Whiter);
        assert_eq!(Trend::classify(-0.005, DEFAULT_TOLERANCE), Trend::Darker);
    }

    #[test]
    fn zero_tolerance_is_exact() {
        assert_eq!(Trend::classify(0.0, 0.0), Trend::NoChange);
        assert_eq!(Trend::classify(1e-12, 0.0), Trend::Whiter);
    }

    #[test]
    fn labels() {
        assert_eq!(Trend::Whiter.label(), "getting whiter");
        assert_eq!(Trend::Darker.label(), "getting darker");
        assert_eq!(Trend::NoChange.label(), "no significant change");
    }

    fn arb_color() -> impl Strategy<Value = Color> {
        proptest::array::uniform3(0u8..=255u8).prop_map(|[r, g, b]| Color::new(r, g, b))
    }

    proptest! {
        #[test]
        fn self_comparison_is_zero(a in arb_color()) {
            prop_assert_eq!(compare(a, a), 0.0);
        }

        #[test]
        fn comparison_is_antisymmetric(a in arb_color(), b in arb_color()) {
            prop_assert_eq!(compare(a, b), -compare(b, a));
        }

        #[test]
        fn brightness_is_deterministic_and_bounded(a in arb_color()) {
            let first = brightness(a);
            prop_assert_eq!(first, brightness(a));
            prop_assert!((0.0..=255.0).contains(&first));
        }
    }
}
