pub mod controls;
pub mod theme;

#[cfg(windows)]
mod painting;
#[cfg(windows)]
mod window;

#[cfg(windows)]
pub use window::{run, Win32App, WindowSink};
