//! Brightness / color-temperature state shared by every overlay

use crate::blend::{Color, Palette};
use crate::error::{DimmerError, Result};

/// Highest accepted brightness percent. Kept below 100 so the screen never goes fully black.
pub const MAX_BRIGHTNESS: i32 = 90;
pub const MAX_COLOR_TEMPERATURE: i32 = 100;

/// The dimming level and warmth driving all overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimmerState {
    brightness: u8,
    color_temperature: u8,
}

impl DimmerState {
    /// Build a state from untrusted stored values, clamping each into its domain.
    pub fn clamped(brightness: i32, color_temperature: i32) -> Self {
        Self {
            brightness: brightness.clamp(0, MAX_BRIGHTNESS) as u8,
            color_temperature: color_temperature.clamp(0, MAX_COLOR_TEMPERATURE) as u8,
        }
    }

    /// Dimming percent, `0..=90`
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Warmth percent, `0..=100`
    pub fn color_temperature(&self) -> u8 {
        self.color_temperature
    }

    pub fn set_brightness(&mut self, percent: i32) -> Result<()> {
        self.brightness = validate("brightness", percent, MAX_BRIGHTNESS)?;
        Ok(())
    }

    pub fn set_color_temperature(&mut self, percent: i32) -> Result<()> {
        self.color_temperature = validate("color temperature", percent, MAX_COLOR_TEMPERATURE)?;
        Ok(())
    }

    /// Overlay alpha derived from the dimming percent
    pub fn opacity(&self) -> f64 {
        f64::from(self.brightness) / 100.0
    }

    pub fn tint(&self, palette: &Palette) -> Color {
        palette.tint(self.color_temperature)
    }
}

fn validate(setting: &'static str, value: i32, max: i32) -> Result<u8> {
    if (0..=max).contains(&value) {
        Ok(value as u8)
    } else {
        Err(DimmerError::OutOfRange {
            setting,
            value,
            max,
        })
    }
}

/// Quick brightness presets offered by the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Reading,
    Movie,
    Night,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Reading, Preset::Movie, Preset::Night];

    pub fn brightness(self) -> i32 {
        match self {
            Preset::Reading => 30,
            Preset::Movie => 65,
            Preset::Night => 85,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::Reading => "Reading",
            Preset::Movie => "Movie",
            Preset::Night => "Night",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Preset::Reading => 0,
            Preset::Movie => 1,
            Preset::Night => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_bounds() {
        let mut state = DimmerState::default();
        assert!(state.set_brightness(0).is_ok());
        assert!(state.set_brightness(90).is_ok());
        assert_eq!(state.brightness(), 90);

        assert!(state.set_brightness(91).is_err());
        assert!(state.set_brightness(-1).is_err());
        assert_eq!(state.brightness(), 90);
    }

    #[test]
    fn test_rejected_brightness_keeps_prior_value() {
        let mut state = DimmerState::default();
        state.set_brightness(50).unwrap();
        let err = state.set_brightness(95).unwrap_err();
        assert!(matches!(
            err,
            DimmerError::OutOfRange {
                value: 95,
                max: 90,
                ..
            }
        ));
        assert_eq!(state.brightness(), 50);
    }

    #[test]
    fn test_color_temperature_bounds() {
        let mut state = DimmerState::default();
        assert!(state.set_color_temperature(100).is_ok());
        assert!(state.set_color_temperature(101).is_err());
        assert_eq!(state.color_temperature(), 100);
    }

    #[test]
    fn test_clamped() {
        let state = DimmerState::clamped(120, -5);
        assert_eq!(state.brightness(), 90);
        assert_eq!(state.color_temperature(), 0);
    }

    #[test]
    fn test_derived_appearance() {
        let state = DimmerState::clamped(40, 0);
        assert!((state.opacity() - 0.40).abs() < f64::EPSILON);
        assert_eq!(state.tint(&Palette::default()), Color::BLACK);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Preset::Reading.brightness(), 30);
        assert_eq!(Preset::Movie.brightness(), 65);
        assert_eq!(Preset::Night.brightness(), 85);
        for preset in Preset::ALL {
            assert_eq!(Preset::from_index(preset.index()), Some(preset));
        }
        assert_eq!(Preset::from_index(3), None);
    }
}
