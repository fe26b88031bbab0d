//! Error types for the dimmer

use std::path::PathBuf;
use thiserror::Error;

use crate::monitor::Rect;

#[derive(Debug, Error)]
pub enum DimmerError {
    #[error("{setting} {value} is outside 0..={max}")]
    OutOfRange {
        setting: &'static str,
        value: i32,
        max: i32,
    },

    #[error("failed to read settings {path}")]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid")]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to create settings directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings {path}")]
    WriteSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings")]
    SerializeSettings(#[from] serde_json::Error),

    #[error("failed to create overlay window at {rect}: {reason}")]
    CreateOverlay { rect: Rect, reason: String },

    #[error("hotkey {binding} could not be registered: {reason}")]
    Hotkey {
        binding: &'static str,
        reason: String,
    },

    #[error("autostart registry access failed: {0}")]
    Autostart(String),
}

pub type Result<T> = std::result::Result<T, DimmerError>;
