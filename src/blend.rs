// Tint color interpolation between a cool and a warm reference color

use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The two endpoints of the color-temperature scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub cool: Color,
    pub warm: Color,
}

impl Palette {
    /// Tint for a color-temperature percentage (0 = cool, 100 = warm)
    pub fn tint(&self, percent: u8) -> Color {
        blend(self.cool, self.warm, f64::from(percent) / 100.0)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            cool: Color::BLACK,
            warm: Color::rgb(255, 140, 70),
        }
    }
}

/// Linearly interpolate each channel from `cool` to `warm`.
///
/// `fraction` is clamped into `[0, 1]` first (NaN counts as 0). Channels are
/// rounded half-to-even.
pub fn blend(cool: Color, warm: Color, fraction: f64) -> Color {
    let t = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };

    let channel = |from: u8, to: u8| -> u8 {
        let from = f64::from(from);
        let to = f64::from(to);
        (from + (to - from) * t).round_ties_even() as u8
    };

    Color {
        r: channel(cool.r, warm.r),
        g: channel(cool.g, warm.g),
        b: channel(cool.b, warm.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOL: Color = Color::rgb(0, 0, 0);
    const WARM: Color = Color::rgb(255, 140, 70);

    #[test]
    fn test_endpoints() {
        assert_eq!(blend(COOL, WARM, 0.0), COOL);
        assert_eq!(blend(COOL, WARM, 1.0), WARM);
    }

    #[test]
    fn test_out_of_range_fraction_is_clamped() {
        assert_eq!(blend(COOL, WARM, -0.5), blend(COOL, WARM, 0.0));
        assert_eq!(blend(COOL, WARM, 1.5), blend(COOL, WARM, 1.0));
        assert_eq!(blend(COOL, WARM, f64::NAN), COOL);
        assert_eq!(blend(COOL, WARM, f64::INFINITY), WARM);
    }

    #[test]
    fn test_midpoint_rounds_half_to_even() {
        // 255 * 0.5 = 127.5 -> 128, 140 * 0.5 = 70, 70 * 0.5 = 35
        assert_eq!(blend(COOL, WARM, 0.5), Color::rgb(128, 70, 35));
        // 0.25: 63.75 -> 64, 35, 17.5 -> 18
        assert_eq!(blend(COOL, WARM, 0.25), Color::rgb(64, 35, 18));
        // 0.05: 12.75 -> 13, 7, 3.5 -> 4
        assert_eq!(blend(COOL, WARM, 0.05), Color::rgb(13, 7, 4));
    }

    #[test]
    fn test_monotonic_per_channel() {
        let up = Color::rgb(10, 200, 0);
        let down = Color::rgb(250, 20, 0);
        let mut prev = blend(up, down, 0.0);
        for step in 1..=100 {
            let next = blend(up, down, step as f64 / 100.0);
            assert!(next.r >= prev.r, "red must not decrease at step {step}");
            assert!(next.g <= prev.g, "green must not increase at step {step}");
            assert_eq!(next.b, 0);
            prev = next;
        }
    }

    #[test]
    fn test_palette_tint() {
        let palette = Palette::default();
        assert_eq!(palette.tint(0), COOL);
        assert_eq!(palette.tint(100), WARM);
        assert_eq!(palette.tint(50), Color::rgb(128, 70, 35));
    }
}
