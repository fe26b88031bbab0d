//! Keeps exactly one overlay per connected monitor, all showing the same
//! tint and opacity derived from the current [`DimmerState`].
//!
//! Owned by the UI thread. Nothing here blocks, and no error escapes: invalid
//! input is dropped and platform failures degrade to fewer overlays.

use crate::blend::{Color, Palette};
use crate::monitor::MonitorSource;
use crate::overlay::{Overlay, OverlayBackend};
use crate::state::{DimmerState, MAX_BRIGHTNESS};

pub struct OverlayCoordinator<B: OverlayBackend, M: MonitorSource> {
    backend: B,
    monitors: M,
    palette: Palette,
    state: DimmerState,
    overlays: Vec<Overlay<B::Surface>>,
    shut_down: bool,
}

impl<B: OverlayBackend, M: MonitorSource> OverlayCoordinator<B, M> {
    /// No overlays exist until the first [`rebuild`](Self::rebuild)
    pub fn new(backend: B, monitors: M, palette: Palette, state: DimmerState) -> Self {
        Self {
            backend,
            monitors,
            palette,
            state,
            overlays: Vec::new(),
            shut_down: false,
        }
    }

    /// Destroy every overlay and create a fresh one per connected monitor.
    ///
    /// Survivors are recreated too, so no overlay can keep a stale rectangle.
    pub fn rebuild(&mut self) {
        if self.shut_down {
            tracing::debug!("Rebuild ignored after shutdown");
            return;
        }

        self.destroy_all();

        let monitors = self.monitors.monitors();
        for monitor in &monitors {
            match Overlay::create(&mut self.backend, monitor.rect) {
                Ok(overlay) => {
                    tracing::debug!(
                        monitor = ?monitor.id,
                        primary = monitor.primary,
                        rect = %monitor.rect,
                        "Overlay created"
                    );
                    self.overlays.push(overlay);
                }
                Err(e) => tracing::warn!(
                    monitor = ?monitor.id,
                    primary = monitor.primary,
                    error = %e,
                    "Monitor left undimmed"
                ),
            }
        }

        tracing::info!(
            monitors = monitors.len(),
            overlays = self.overlays.len(),
            "Rebuilt overlays"
        );
        self.push_appearance();
    }

    /// Store a new dimming percent (`0..=90`) and push it to every overlay.
    ///
    /// Out-of-range input is ignored. Returns whether it was accepted.
    pub fn set_brightness(&mut self, percent: i32) -> bool {
        if let Err(e) = self.state.set_brightness(percent) {
            tracing::debug!(error = %e, "Ignored brightness");
            return false;
        }
        self.push_appearance();
        true
    }

    /// Store a new warmth percent (`0..=100`) and push it to every overlay.
    pub fn set_color_temperature(&mut self, percent: i32) -> bool {
        if let Err(e) = self.state.set_color_temperature(percent) {
            tracing::debug!(error = %e, "Ignored color temperature");
            return false;
        }
        self.push_appearance();
        true
    }

    /// Move brightness by `delta`, saturating at the domain bounds.
    /// Already sitting at the bound is a no-op.
    pub fn step_brightness(&mut self, delta: i32) -> bool {
        let current = i32::from(self.state.brightness());
        let target = current.saturating_add(delta).clamp(0, MAX_BRIGHTNESS);
        if target == current {
            return false;
        }
        self.set_brightness(target)
    }

    /// Recreate the overlay set if any platform window vanished
    pub fn verify(&mut self) -> bool {
        if self.shut_down || self.overlays.iter().all(|o| o.is_alive()) {
            return false;
        }
        tracing::warn!("Overlay window destroyed externally, recreating");
        self.rebuild();
        true
    }

    /// Destroy all overlays. Later calls and later rebuilds are no-ops.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.destroy_all();
        self.shut_down = true;
        tracing::info!("Overlays shut down");
    }

    pub fn state(&self) -> DimmerState {
        self.state
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn overlays(&self) -> &[Overlay<B::Surface>] {
        &self.overlays
    }

    /// Tint and opacity every overlay should currently show
    pub fn appearance(&self) -> (Color, f64) {
        (self.state.tint(&self.palette), self.state.opacity())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    fn push_appearance(&mut self) {
        if self.overlays.is_empty() {
            return;
        }
        let (tint, opacity) = self.appearance();
        for overlay in &mut self.overlays {
            overlay.set_appearance(tint, opacity);
        }
    }

    fn destroy_all(&mut self) {
        for mut overlay in self.overlays.drain(..) {
            overlay.destroy();
        }
    }
}

impl<B: OverlayBackend, M: MonitorSource> Drop for OverlayCoordinator<B, M> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
