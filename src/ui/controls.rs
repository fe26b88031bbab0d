// Control panel state: widget geometry, hit-testing and the commands that
// clicks and drags produce. Kept free of Win32 types so it can be tested.

use super::theme::*;
use crate::command::Command;
use crate::monitor::Rect;
use crate::state::{DimmerState, Preset, MAX_BRIGHTNESS, MAX_COLOR_TEMPERATURE};

/// A horizontal slider over `0..=max`
#[derive(Debug, Clone)]
pub struct SliderState {
    pub value: i32,
    pub max: i32,
    pub dragging: bool,
    /// Full track
    pub rect: Rect,
    /// Grab area, a little larger than the track
    pub thumb_rect: Rect,
}

impl SliderState {
    pub fn new(value: i32, max: i32) -> Self {
        Self {
            value: value.clamp(0, max),
            max,
            dragging: false,
            rect: Rect::default(),
            thumb_rect: Rect::default(),
        }
    }

    fn place(&mut self, track: Rect) {
        self.rect = track;
        self.thumb_rect = Rect::new(
            track.x - THUMB_RADIUS,
            track.y - THUMB_RADIUS - 4,
            track.width + 2 * THUMB_RADIUS,
            track.height + 2 * THUMB_RADIUS + 8,
        );
    }

    /// x of the thumb center for the current value
    pub fn thumb_x(&self) -> i32 {
        self.rect.x + self.fill_width()
    }

    /// Width of the filled part of the track
    pub fn fill_width(&self) -> i32 {
        if self.max <= 0 {
            return 0;
        }
        (self.value as f32 / self.max as f32 * self.rect.width as f32) as i32
    }

    /// Value under an x position, clamped to the track
    pub fn value_from_x(&self, x: i32) -> i32 {
        if self.rect.width <= 0 {
            return self.value;
        }
        let rel_x = (x - self.rect.x).clamp(0, self.rect.width);
        ((rel_x as f32 / self.rect.width as f32) * self.max as f32).round() as i32
    }
}

#[derive(Debug, Clone)]
pub struct ToggleState {
    pub checked: bool,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub struct PresetButton {
    pub preset: Preset,
    pub rect: Rect,
}

/// Which widget is under a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Brightness,
    Warmth,
    Preset(Preset),
    Autostart,
}

/// Complete control panel state
pub struct UiState {
    pub brightness: SliderState,
    pub warmth: SliderState,
    pub presets: [PresetButton; 3],
    pub autostart: ToggleState,

    pub brightness_card: Rect,
    pub presets_row: Rect,
    pub warmth_card: Rect,
    pub autostart_card: Rect,
    pub footer_y: i32,

    pub toast_message: String,
    pub toast_visible: bool,
}

impl UiState {
    pub fn new(state: DimmerState, autostart: bool) -> Self {
        let mut ui = Self {
            brightness: SliderState::new(i32::from(state.brightness()), MAX_BRIGHTNESS),
            warmth: SliderState::new(i32::from(state.color_temperature()), MAX_COLOR_TEMPERATURE),
            presets: Preset::ALL.map(|preset| PresetButton {
                preset,
                rect: Rect::default(),
            }),
            autostart: ToggleState {
                checked: autostart,
                rect: Rect::default(),
            },
            brightness_card: Rect::default(),
            presets_row: Rect::default(),
            warmth_card: Rect::default(),
            autostart_card: Rect::default(),
            footer_y: 0,
            toast_message: String::new(),
            toast_visible: false,
        };
        ui.layout();
        ui
    }

    /// Assign every widget its rectangle in client coordinates
    fn layout(&mut self) {
        let x = PADDING;
        let inner_x = x + CARD_INSET;
        let inner_width = CONTENT_WIDTH - 2 * CARD_INSET;
        let mut y = PADDING + HEADER_HEIGHT + GAP;

        self.brightness_card = Rect::new(x, y, CONTENT_WIDTH, BRIGHTNESS_CARD_HEIGHT);
        self.brightness
            .place(Rect::new(inner_x, y + 48, inner_width, TRACK_HEIGHT));
        y += BRIGHTNESS_CARD_HEIGHT + GAP;

        self.presets_row = Rect::new(x, y, CONTENT_WIDTH, PRESET_HEIGHT);
        let button_width = (CONTENT_WIDTH - PRESET_LABEL_WIDTH - 2 * PRESET_GAP) / 3;
        for (i, button) in self.presets.iter_mut().enumerate() {
            let bx = x + PRESET_LABEL_WIDTH + i as i32 * (button_width + PRESET_GAP);
            button.rect = Rect::new(bx, y, button_width, PRESET_HEIGHT);
        }
        y += PRESET_HEIGHT + GAP;

        self.warmth_card = Rect::new(x, y, CONTENT_WIDTH, WARMTH_CARD_HEIGHT);
        self.warmth
            .place(Rect::new(inner_x, y + 44, inner_width, TRACK_HEIGHT));
        y += WARMTH_CARD_HEIGHT + GAP;

        self.autostart_card = Rect::new(x, y, CONTENT_WIDTH, AUTOSTART_CARD_HEIGHT);
        self.autostart.rect = Rect::new(
            inner_x + inner_width - TOGGLE_WIDTH,
            y + (AUTOSTART_CARD_HEIGHT - TOGGLE_HEIGHT) / 2,
            TOGGLE_WIDTH,
            TOGGLE_HEIGHT,
        );
        y += AUTOSTART_CARD_HEIGHT;

        self.footer_y = y + GAP;
    }

    pub fn hit_test(&self, x: i32, y: i32) -> Option<Hit> {
        if self.brightness.thumb_rect.contains(x, y) {
            return Some(Hit::Brightness);
        }
        if self.warmth.thumb_rect.contains(x, y) {
            return Some(Hit::Warmth);
        }
        if let Some(button) = self.presets.iter().find(|b| b.rect.contains(x, y)) {
            return Some(Hit::Preset(button.preset));
        }
        if self.autostart.rect.contains(x, y) {
            return Some(Hit::Autostart);
        }
        None
    }

    /// Mouse button pressed. Starts slider drags; returns the resulting command.
    pub fn press(&mut self, x: i32, y: i32) -> Option<Command> {
        match self.hit_test(x, y)? {
            Hit::Brightness => {
                self.brightness.dragging = true;
                self.brightness.value = self.brightness.value_from_x(x);
                Some(Command::SetBrightness(self.brightness.value))
            }
            Hit::Warmth => {
                self.warmth.dragging = true;
                self.warmth.value = self.warmth.value_from_x(x);
                Some(Command::SetColorTemperature(self.warmth.value))
            }
            Hit::Preset(preset) => {
                self.brightness.value = preset.brightness();
                Some(Command::ApplyPreset(preset))
            }
            Hit::Autostart => {
                self.autostart.checked = !self.autostart.checked;
                Some(Command::SetAutostart(self.autostart.checked))
            }
        }
    }

    /// Mouse moved; live-updates whichever slider is being dragged
    pub fn drag_to(&mut self, x: i32) -> Option<Command> {
        if self.brightness.dragging {
            let value = self.brightness.value_from_x(x);
            if value != self.brightness.value {
                self.brightness.value = value;
                return Some(Command::SetBrightness(value));
            }
        } else if self.warmth.dragging {
            let value = self.warmth.value_from_x(x);
            if value != self.warmth.value {
                self.warmth.value = value;
                return Some(Command::SetColorTemperature(value));
            }
        }
        None
    }

    /// Mouse released or capture lost. Returns whether a drag ended.
    pub fn release(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.brightness.dragging = false;
        self.warmth.dragging = false;
        was_dragging
    }

    pub fn is_dragging(&self) -> bool {
        self.brightness.dragging || self.warmth.dragging
    }

    /// Mirror the authoritative state (hotkeys change it behind the sliders' back)
    pub fn sync(&mut self, state: DimmerState) {
        self.brightness.value = i32::from(state.brightness());
        self.warmth.value = i32::from(state.color_temperature());
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = message.into();
        self.toast_visible = true;
    }

    pub fn hide_toast(&mut self) {
        self.toast_visible = false;
        self.toast_message.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui() -> UiState {
        UiState::new(DimmerState::clamped(30, 0), false)
    }

    fn center(r: Rect) -> (i32, i32) {
        (r.x + r.width / 2, r.y + r.height / 2)
    }

    #[test]
    fn test_layout_fits_window() {
        let ui = ui();
        assert!(ui.autostart_card.bottom() <= WINDOW_HEIGHT);
        assert!(ui.footer_y < WINDOW_HEIGHT);
        for button in &ui.presets {
            assert!(button.rect.right() <= PADDING + CONTENT_WIDTH);
        }
        assert!(ui.brightness_card.bottom() <= ui.presets_row.y);
        assert!(ui.presets_row.bottom() <= ui.warmth_card.y);
    }

    #[test]
    fn test_slider_value_from_x() {
        let ui = ui();
        let s = &ui.brightness;
        assert_eq!(s.value_from_x(s.rect.x - 50), 0);
        assert_eq!(s.value_from_x(s.rect.right() + 50), 90);
        assert_eq!(s.value_from_x(s.rect.x + s.rect.width / 2), 45);
    }

    #[test]
    fn test_thumb_tracks_value() {
        let mut ui = ui();
        ui.brightness.value = 0;
        assert_eq!(ui.brightness.thumb_x(), ui.brightness.rect.x);
        ui.brightness.value = 90;
        assert_eq!(ui.brightness.thumb_x(), ui.brightness.rect.right());
    }

    #[test]
    fn test_hit_test() {
        let ui = ui();
        assert_eq!(
            ui.hit_test(ui.brightness.rect.x + 5, ui.brightness.rect.y),
            Some(Hit::Brightness)
        );
        let (x, y) = center(ui.warmth.rect);
        assert_eq!(ui.hit_test(x, y), Some(Hit::Warmth));
        let (x, y) = center(ui.presets[1].rect);
        assert_eq!(ui.hit_test(x, y), Some(Hit::Preset(Preset::Movie)));
        let (x, y) = center(ui.autostart.rect);
        assert_eq!(ui.hit_test(x, y), Some(Hit::Autostart));
        assert_eq!(ui.hit_test(1, 1), None);
    }

    #[test]
    fn test_drag_produces_commands() {
        let mut ui = ui();
        let track = ui.brightness.rect;
        assert_eq!(
            ui.press(track.x, track.y),
            Some(Command::SetBrightness(0))
        );
        assert!(ui.is_dragging());

        assert_eq!(ui.drag_to(track.right()), Some(Command::SetBrightness(90)));
        // no change, no command
        assert_eq!(ui.drag_to(track.right() + 20), None);

        assert!(ui.release());
        assert!(!ui.release());
        assert_eq!(ui.drag_to(track.x), None);
    }

    #[test]
    fn test_preset_and_toggle() {
        let mut ui = ui();
        let (x, y) = center(ui.presets[2].rect);
        assert_eq!(ui.press(x, y), Some(Command::ApplyPreset(Preset::Night)));
        assert_eq!(ui.brightness.value, 85);
        assert!(!ui.is_dragging());

        let (x, y) = center(ui.autostart.rect);
        assert_eq!(ui.press(x, y), Some(Command::SetAutostart(true)));
        assert_eq!(ui.press(x, y), Some(Command::SetAutostart(false)));
    }

    #[test]
    fn test_sync_and_toast() {
        let mut ui = ui();
        ui.sync(DimmerState::clamped(12, 70));
        assert_eq!(ui.brightness.value, 12);
        assert_eq!(ui.warmth.value, 70);

        ui.show_toast("Hotkey unavailable");
        assert!(ui.toast_visible);
        ui.hide_toast();
        assert!(!ui.toast_visible);
        assert!(ui.toast_message.is_empty());
    }
}
