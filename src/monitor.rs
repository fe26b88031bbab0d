//! Monitor topology: what displays exist and when that set changes
//!
//! The OS stays the single source of truth. A display-change signal carries no
//! delta, so listeners re-query a [`MonitorSource`] themselves.

use std::fmt;
use std::sync::Arc;

/// Rectangle in virtual-screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if a point is inside (right/bottom edges excluded)
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@({},{})", self.width, self.height, self.x, self.y)
    }
}

/// Opaque platform handle of a display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorId(pub isize);

/// A connected display as reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    pub id: MonitorId,
    pub rect: Rect,
    pub primary: bool,
}

/// Queries the set of currently connected displays
pub trait MonitorSource {
    fn monitors(&self) -> Vec<Monitor>;
}

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Relays the OS display-configuration-changed signal to one listener.
///
/// `notify` may be called from whichever thread the OS delivers the signal on.
/// The listener is expected to marshal onto the thread that owns the overlays
/// (see [`crate::command::CommandSink`]) rather than touch them directly.
#[derive(Default)]
pub struct TopologyWatcher {
    listener: Option<Listener>,
}

impl TopologyWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        tracing::debug!("Subscribed to display changes");
    }

    pub fn unsubscribe(&mut self) {
        if self.listener.take().is_some() {
            tracing::debug!("Unsubscribed from display changes");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.listener.is_some()
    }

    /// Called once per OS display-change event
    pub fn notify(&self) {
        match &self.listener {
            Some(listener) => {
                tracing::info!("Display configuration changed");
                listener();
            }
            None => tracing::debug!("Display change ignored, no subscriber"),
        }
    }
}

impl fmt::Debug for TopologyWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopologyWatcher")
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}
