//! Screen dimmer: dims every monitor beyond its hardware minimum by layering a
//! borderless, click-through, translucent tinted window over each display.
//!
//! The overlay set is rebuilt whenever the monitor topology changes, and every
//! overlay always shows the same tint and opacity derived from one
//! [`state::DimmerState`].

pub mod app;
pub mod autostart;
pub mod blend;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod hotkeys;
pub mod logging;
pub mod monitor;
pub mod overlay;
pub mod state;
pub mod tray;
pub mod ui;

pub use error::{DimmerError, Result};
