use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DimmerError, Result};
use crate::state::DimmerState;

/// Persisted dimmer levels, stored as JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_brightness")]
    pub brightness: i32,
    #[serde(default)]
    pub color_temperature: i32,
}

fn default_brightness() -> i32 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brightness: default_brightness(),
            color_temperature: 0,
        }
    }
}

impl Settings {
    pub fn from_state(state: DimmerState) -> Self {
        Self {
            brightness: i32::from(state.brightness()),
            color_temperature: i32::from(state.color_temperature()),
        }
    }

    /// Stored values are untrusted; anything out of range is clamped
    pub fn to_state(self) -> DimmerState {
        let state = DimmerState::clamped(self.brightness, self.color_temperature);
        if Settings::from_state(state) != self {
            tracing::warn!(
                brightness = self.brightness,
                color_temperature = self.color_temperature,
                "Stored settings out of range, clamped"
            );
        }
        state
    }
}

/// Key-value persistence for the last used levels
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings file under the per-user config directory
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(app_dir().join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<config_dir>/ScreenDimmer`, falling back to the working directory
pub fn app_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("ScreenDimmer")
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let data = fs::read_to_string(&self.path).map_err(|source| DimmerError::ReadSettings {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| DimmerError::ParseSettings {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| DimmerError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let data = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, data).map_err(|source| DimmerError::WriteSettings {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("screen-dimmer-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let store = JsonSettingsStore::new(scratch("missing/settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = JsonSettingsStore::new(scratch("saved/settings.json"));
        let settings = Settings {
            brightness: 65,
            color_temperature: 40,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "color_temperature": 70 }"#).unwrap();
        assert_eq!(settings.brightness, 30);
        assert_eq!(settings.color_temperature, 70);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = scratch("corrupt/settings.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = JsonSettingsStore::new(&path).load().unwrap_err();
        assert!(matches!(err, DimmerError::ParseSettings { .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let state = Settings {
            brightness: 100,
            color_temperature: -20,
        }
        .to_state();
        assert_eq!(state.brightness(), 90);
        assert_eq!(state.color_temperature(), 0);
    }
}
