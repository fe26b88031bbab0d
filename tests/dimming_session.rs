// End-to-end session against in-memory platform fakes: two monitors, a
// disconnect, hotkeys at the bounds and persistence at exit.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc;

use screen_dimmer::app::App;
use screen_dimmer::autostart::Autostart;
use screen_dimmer::blend::{Color, Palette};
use screen_dimmer::command::{Command, Flow};
use screen_dimmer::config::{JsonSettingsStore, Settings, SettingsStore};
use screen_dimmer::hotkeys::{command_for, HOTKEY_DECREASE, HOTKEY_INCREASE};
use screen_dimmer::monitor::{Monitor, MonitorId, MonitorSource, Rect};
use screen_dimmer::overlay::{OverlayBackend, OverlaySurface};
use screen_dimmer::{DimmerError, Result};

const LEFT: Rect = Rect::new(0, 0, 1920, 1080);
const RIGHT: Rect = Rect::new(1920, 0, 2560, 1440);

struct NullSurface {
    live: Rc<Cell<usize>>,
}

impl OverlaySurface for NullSurface {
    fn apply(&mut self, _tint: Color, _opacity: f64) {}

    fn release(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

#[derive(Default)]
struct CountingBackend {
    live: Rc<Cell<usize>>,
}

impl OverlayBackend for CountingBackend {
    type Surface = NullSurface;

    fn create_surface(&mut self, _rect: Rect) -> Result<NullSurface> {
        self.live.set(self.live.get() + 1);
        Ok(NullSurface {
            live: Rc::clone(&self.live),
        })
    }
}

#[derive(Clone, Default)]
struct Displays(Rc<RefCell<Vec<Rect>>>);

impl Displays {
    fn connect(&self, rects: &[Rect]) {
        *self.0.borrow_mut() = rects.to_vec();
    }
}

impl MonitorSource for Displays {
    fn monitors(&self) -> Vec<Monitor> {
        self.0
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, rect)| Monitor {
                id: MonitorId(i as isize + 1),
                rect: *rect,
                primary: i == 0,
            })
            .collect()
    }
}

#[derive(Clone, Default)]
struct MemoryStore {
    saved: Rc<RefCell<Vec<Settings>>>,
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.saved.borrow().last().copied().unwrap_or_default())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        self.saved.borrow_mut().push(*settings);
        Ok(())
    }
}

struct DeniedAutostart;

impl Autostart for DeniedAutostart {
    fn is_enabled(&self) -> Result<bool> {
        Ok(false)
    }

    fn set_enabled(&self, _enabled: bool) -> Result<()> {
        Err(DimmerError::Autostart("access denied".into()))
    }
}

#[test]
fn test_two_monitor_session() {
    let backend = CountingBackend::default();
    let live = Rc::clone(&backend.live);
    let displays = Displays::default();
    displays.connect(&[LEFT, RIGHT]);
    let store = MemoryStore::default();

    let mut app = App::new(
        backend,
        displays.clone(),
        Box::new(store.clone()),
        Box::new(DeniedAutostart),
    );
    let (tx, rx) = mpsc::channel();
    app.start(tx);
    assert_eq!(live.get(), 2);

    assert_eq!(app.dispatch(Command::SetBrightness(40)), Flow::Continue);
    app.dispatch(Command::SetColorTemperature(0));
    for overlay in app.coordinator().overlays() {
        assert_eq!(overlay.opacity(), 0.40);
        assert_eq!(overlay.tint(), Palette::default().cool);
    }

    // Unplug the right monitor; the rebuild arrives through the queue
    displays.connect(&[LEFT]);
    app.display_changed();
    let command = rx.try_recv().expect("rebuild posted");
    assert_eq!(command, Command::RebuildOverlays);
    app.dispatch(command);

    let overlays = app.coordinator().overlays();
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].rect(), LEFT);
    assert_eq!(overlays[0].opacity(), 0.40);
    assert_eq!(live.get(), 1);

    // Rejected without side effects
    app.dispatch(Command::SetBrightness(95));
    assert_eq!(app.state().brightness(), 40);

    // Still rejected after crossing the message queue
    let (tag, payload) = Command::SetBrightness((1 << 24) + 50).to_words();
    let queued = Command::from_words(tag, payload).expect("well-formed");
    app.dispatch(queued);
    assert_eq!(app.state().brightness(), 40);

    for _ in 0..60 {
        app.dispatch(command_for(HOTKEY_INCREASE).expect("bound"));
    }
    assert_eq!(app.state().brightness(), 90);
    for _ in 0..200 {
        app.dispatch(command_for(HOTKEY_DECREASE).expect("bound"));
    }
    assert_eq!(app.state().brightness(), 0);

    app.dispatch(Command::SetAutostart(true));
    assert_eq!(app.take_notices().len(), 1);

    app.dispatch(Command::SetBrightness(55));
    assert_eq!(app.dispatch(Command::Exit), Flow::Exit);
    assert!(!app.is_shut_down());
    app.shutdown();
    app.shutdown();
    assert!(app.is_shut_down());
    assert_eq!(app.dispatch(Command::SetBrightness(10)), Flow::Exit);

    assert_eq!(live.get(), 0);
    assert_eq!(
        *store.saved.borrow(),
        vec![Settings {
            brightness: 55,
            color_temperature: 0,
        }]
    );

    // Signals after shutdown go nowhere
    app.display_changed();
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_levels_survive_restart() {
    let path = std::env::temp_dir().join(format!(
        "screen-dimmer-session-{}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let displays = Displays::default();
    displays.connect(&[LEFT]);

    let mut first = App::new(
        CountingBackend::default(),
        displays.clone(),
        Box::new(JsonSettingsStore::new(&path)),
        Box::new(DeniedAutostart),
    );
    first.start(mpsc::channel().0);
    first.dispatch(Command::SetBrightness(65));
    first.dispatch(Command::SetColorTemperature(80));
    first.shutdown();

    let second = App::new(
        CountingBackend::default(),
        displays,
        Box::new(JsonSettingsStore::new(&path)),
        Box::new(DeniedAutostart),
    );
    assert_eq!(second.state().brightness(), 65);
    assert_eq!(second.state().color_temperature(), 80);

    let _ = std::fs::remove_file(&path);
}
