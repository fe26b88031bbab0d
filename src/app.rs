//! Application controller.
//!
//! Owns the overlay coordinator, the topology watcher and the external
//! collaborators (settings store, autostart). Every input, whether a slider,
//! hotkey, tray item or display change, arrives as a [`Command`] on the UI
//! thread and goes through [`App::dispatch`].

use crate::autostart::Autostart;
use crate::blend::Palette;
use crate::command::{Command, CommandSink, Flow};
use crate::config::{Settings, SettingsStore};
use crate::coordinator::OverlayCoordinator;
use crate::error::DimmerError;
use crate::monitor::{MonitorSource, TopologyWatcher};
use crate::overlay::OverlayBackend;
use crate::state::DimmerState;

pub struct App<B: OverlayBackend, M: MonitorSource> {
    coordinator: OverlayCoordinator<B, M>,
    watcher: TopologyWatcher,
    settings: Box<dyn SettingsStore>,
    autostart: Box<dyn Autostart>,
    notices: Vec<String>,
    started: bool,
    shut_down: bool,
}

impl<B: OverlayBackend, M: MonitorSource> App<B, M> {
    /// Load the last levels from `settings`. Nothing is shown until [`start`](Self::start).
    pub fn new(
        backend: B,
        monitors: M,
        settings: Box<dyn SettingsStore>,
        autostart: Box<dyn Autostart>,
    ) -> Self {
        let state = match settings.load() {
            Ok(stored) => stored.to_state(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load settings, using defaults");
                Settings::default().to_state()
            }
        };
        tracing::info!(
            brightness = state.brightness(),
            color_temperature = state.color_temperature(),
            "Loaded dimmer state"
        );

        Self {
            coordinator: OverlayCoordinator::new(backend, monitors, Palette::default(), state),
            watcher: TopologyWatcher::new(),
            settings,
            autostart,
            notices: Vec::new(),
            started: false,
            shut_down: false,
        }
    }

    /// Subscribe to display changes and build the first overlay set.
    ///
    /// Display-change signals are re-posted through `sink` as
    /// [`Command::RebuildOverlays`], so the rebuild always runs on the UI thread.
    pub fn start<S: CommandSink + 'static>(&mut self, sink: S) {
        if self.started || self.shut_down {
            return;
        }
        self.watcher
            .subscribe(move || sink.post(Command::RebuildOverlays));
        self.coordinator.rebuild();
        self.started = true;
    }

    pub fn dispatch(&mut self, command: Command) -> Flow {
        if self.shut_down {
            return Flow::Exit;
        }
        tracing::debug!(?command, "Dispatch");

        match command {
            Command::SetBrightness(percent) => {
                self.coordinator.set_brightness(percent);
            }
            Command::SetColorTemperature(percent) => {
                self.coordinator.set_color_temperature(percent);
            }
            Command::StepBrightness(delta) => {
                self.coordinator.step_brightness(delta);
            }
            Command::ApplyPreset(preset) => {
                self.coordinator.set_brightness(preset.brightness());
            }
            Command::SetAutostart(enabled) => self.set_autostart(enabled),
            Command::RebuildOverlays => self.coordinator.rebuild(),
            Command::VerifyOverlays => {
                self.coordinator.verify();
            }
            Command::ShowControls => return Flow::ShowControls,
            Command::Exit => return Flow::Exit,
        }
        Flow::Continue
    }

    /// The OS reported a display-configuration change
    pub fn display_changed(&self) {
        self.watcher.notify();
    }

    /// Record a non-fatal problem for the UI to show
    pub fn report(&mut self, error: &DimmerError) {
        self.notices.push(error.to_string());
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Registry state, or `false` when it cannot be read
    pub fn autostart_enabled(&self) -> bool {
        self.autostart.is_enabled().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read autostart state");
            false
        })
    }

    pub fn state(&self) -> DimmerState {
        self.coordinator.state()
    }

    pub fn coordinator(&self) -> &OverlayCoordinator<B, M> {
        &self.coordinator
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Stop watching displays, destroy all overlays and persist the levels.
    /// Runs once; later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        self.watcher.unsubscribe();
        self.coordinator.shutdown();

        let settings = Settings::from_state(self.coordinator.state());
        match self.settings.save(&settings) {
            Ok(()) => tracing::info!(?settings, "Saved settings"),
            Err(e) => tracing::warn!(error = %e, "Could not save settings"),
        }
    }

    fn set_autostart(&mut self, enabled: bool) {
        match self.autostart.set_enabled(enabled) {
            Ok(()) => tracing::info!(enabled, "Autostart updated"),
            Err(e) => {
                tracing::warn!(error = %e, enabled, "Could not update autostart");
                self.report(&e);
            }
        }
    }
}
