/// An 8-bit sRGB triple as reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Substituted when no real measurement is available.
pub const FALLBACK_SHADE: Color = Color::new(220, 220, 210);

/// The "standard white" every report line is measured against.
pub const REFERENCE_WHITE: Color = Color::new(220, 220, 210);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from floating point channels, truncating toward zero
    /// and clamping into [0, 255].
    pub fn from_channels(red: f32, green: f32, blue: f32) -> Self {
        fn channel(v: f32) -> u8 {
            if v.is_nan() {
                0
            } else {
                v.clamp(0.0, 255.0) as u8
            }
        }
        Self::new(channel(red), channel(green), channel(blue))
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// WCAG 2.0 relative luminance, used to pick readable text over a swatch.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::new(0, 0, 0);
    const WHITE: Color = Color::new(255, 255, 255);

    #[test]
    fn to_hex_is_lowercase() {
        assert_eq!(FALLBACK_SHADE.to_hex(), "#dcdcd2");
        assert_eq!(Color::new(171, 205, 239).to_hex(), "#abcdef");
    }

    #[test]
    fn display_uses_rgb_notation() {
        assert_eq!(Color::new(200, 190, 180).to_string(), "RGB(200, 190, 180)");
    }

    #[test]
    fn from_channels_truncates() {
        assert_eq!(
            Color::from_channels(200.9, 190.2, 180.0),
            Color::new(200, 190, 180)
        );
    }

    #[test]
    fn from_channels_clamps_out_of_range() {
        assert_eq!(Color::from_channels(-4.0, 300.0, f32::NAN), Color::new(0, 255, 0));
    }

    #[test]
    fn relative_luminance_bounds() {
        assert!(BLACK.relative_luminance() < 0.001);
        assert!((WHITE.relative_luminance() - 1.0).abs() < 0.001);
    }
}
