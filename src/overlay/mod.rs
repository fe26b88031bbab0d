// Overlay windows: one tinted, translucent, click-through rectangle per monitor.
//
// The platform side is reduced to two capabilities:
//   • OverlayBackend creates a surface whose input/visual properties (no chrome,
//     hidden from taskbar and window switcher, topmost, click-through, alpha 0)
//     are fixed at creation time. Some platforms honour click-through
//     unreliably when it is applied to an already visible window.
//   • OverlaySurface pushes a tint + alpha pair and releases the window.
//
// `Overlay` wraps a surface and owns the policy: range checks, idempotent
// destroy, and remembering what is currently shown.

#[cfg(windows)]
pub mod windows;

use crate::blend::Color;
use crate::error::Result;
use crate::monitor::Rect;

/// A live platform window covering one monitor
pub trait OverlaySurface {
    /// Set tint and alpha together. `opacity` is already validated to `0..=1`.
    fn apply(&mut self, tint: Color, opacity: f64);

    /// Whether the platform window still exists
    fn is_alive(&self) -> bool {
        true
    }

    /// Release the platform window. Called at most once per surface.
    fn release(&mut self);
}

/// Factory for overlay surfaces
pub trait OverlayBackend {
    type Surface: OverlaySurface;

    fn create_surface(&mut self, rect: Rect) -> Result<Self::Surface>;
}

/// One overlay bound to one monitor rectangle
pub struct Overlay<S: OverlaySurface> {
    surface: Option<S>,
    rect: Rect,
    tint: Color,
    opacity: f64,
}

impl<S: OverlaySurface> Overlay<S> {
    /// Create a fully transparent overlay covering `rect`
    pub fn create<B>(backend: &mut B, rect: Rect) -> Result<Self>
    where
        B: OverlayBackend<Surface = S>,
    {
        let surface = backend.create_surface(rect)?;
        Ok(Self {
            surface: Some(surface),
            rect,
            tint: Color::BLACK,
            opacity: 0.0,
        })
    }

    /// Update tint and opacity together.
    ///
    /// Opacity outside `0..=1` (or NaN) is rejected and leaves the overlay
    /// untouched; it is not clamped. Destroyed overlays ignore the call.
    pub fn set_appearance(&mut self, tint: Color, opacity: f64) {
        if !(0.0..=1.0).contains(&opacity) {
            tracing::debug!(opacity, rect = %self.rect, "Rejected overlay opacity");
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.apply(tint, opacity);
        self.tint = tint;
        self.opacity = opacity;
    }

    /// Release the platform window. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn tint(&self) -> Color {
        self.tint
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn is_destroyed(&self) -> bool {
        self.surface.is_none()
    }

    /// False once the window was released or vanished underneath us
    pub fn is_alive(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| s.is_alive())
    }
}

impl<S: OverlaySurface> Drop for Overlay<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        applied: Vec<(Color, f64)>,
        releases: usize,
    }

    struct FakeSurface(Rc<RefCell<Log>>);

    impl OverlaySurface for FakeSurface {
        fn apply(&mut self, tint: Color, opacity: f64) {
            self.0.borrow_mut().applied.push((tint, opacity));
        }

        fn release(&mut self) {
            self.0.borrow_mut().releases += 1;
        }
    }

    struct FakeBackend(Rc<RefCell<Log>>);

    impl OverlayBackend for FakeBackend {
        type Surface = FakeSurface;

        fn create_surface(&mut self, _rect: Rect) -> Result<FakeSurface> {
            Ok(FakeSurface(self.0.clone()))
        }
    }

    fn overlay() -> (Overlay<FakeSurface>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut backend = FakeBackend(log.clone());
        let overlay = Overlay::create(&mut backend, Rect::new(0, 0, 800, 600)).unwrap();
        (overlay, log)
    }

    #[test]
    fn test_starts_transparent() {
        let (overlay, log) = overlay();
        assert_eq!(overlay.opacity(), 0.0);
        assert_eq!(overlay.rect(), Rect::new(0, 0, 800, 600));
        assert!(log.borrow().applied.is_empty());
    }

    #[test]
    fn test_set_appearance_updates_both() {
        let (mut overlay, log) = overlay();
        let tint = Color::rgb(200, 100, 50);
        overlay.set_appearance(tint, 0.4);
        assert_eq!(overlay.tint(), tint);
        assert_eq!(overlay.opacity(), 0.4);
        assert_eq!(log.borrow().applied, vec![(tint, 0.4)]);
    }

    #[test]
    fn test_out_of_range_opacity_is_rejected_not_clamped() {
        let (mut overlay, log) = overlay();
        overlay.set_appearance(Color::BLACK, 0.3);

        overlay.set_appearance(Color::rgb(1, 2, 3), 1.5);
        overlay.set_appearance(Color::rgb(1, 2, 3), -0.1);
        overlay.set_appearance(Color::rgb(1, 2, 3), f64::NAN);

        assert_eq!(overlay.opacity(), 0.3);
        assert_eq!(overlay.tint(), Color::BLACK);
        assert_eq!(log.borrow().applied.len(), 1);
    }

    #[test]
    fn test_bounds_are_accepted() {
        let (mut overlay, _log) = overlay();
        overlay.set_appearance(Color::BLACK, 1.0);
        assert_eq!(overlay.opacity(), 1.0);
        overlay.set_appearance(Color::BLACK, 0.0);
        assert_eq!(overlay.opacity(), 0.0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (mut overlay, log) = overlay();
        overlay.destroy();
        overlay.destroy();
        assert!(overlay.is_destroyed());
        assert!(!overlay.is_alive());
        drop(overlay);
        assert_eq!(log.borrow().releases, 1);
    }

    #[test]
    fn test_drop_releases_window() {
        let (overlay, log) = overlay();
        drop(overlay);
        assert_eq!(log.borrow().releases, 1);
    }

    #[test]
    fn test_destroyed_overlay_ignores_updates() {
        let (mut overlay, log) = overlay();
        overlay.destroy();
        overlay.set_appearance(Color::BLACK, 0.5);
        assert!(log.borrow().applied.is_empty());
        assert_eq!(overlay.opacity(), 0.0);
    }
}
