use crate::blend::Color;

// ── Colors (dark theme) ─────────────────────────────────────────────────────

pub const CLR_BACKGROUND: Color = Color::rgb(24, 24, 27);
pub const CLR_CARD: Color = Color::rgb(32, 32, 36);
pub const CLR_FOREGROUND: Color = Color::rgb(244, 244, 245);
pub const CLR_MUTED_FG: Color = Color::rgb(161, 161, 170);
pub const CLR_SECONDARY: Color = Color::rgb(63, 63, 70);
pub const CLR_BORDER: Color = Color::rgb(52, 52, 58);
/// Amber accent for active track, badge and toggles
pub const CLR_ACCENT: Color = Color::rgb(245, 158, 11);

// ── Dimensions ───────────────────────────────────────────────────────────────

/// Control panel client area
pub const WINDOW_WIDTH: i32 = 360;
pub const WINDOW_HEIGHT: i32 = 424;

pub const PADDING: i32 = 20;
pub const CONTENT_WIDTH: i32 = WINDOW_WIDTH - 2 * PADDING;
/// Horizontal inset of card contents
pub const CARD_INSET: i32 = 16;
pub const CARD_RADIUS: i32 = 8;
pub const GAP: i32 = 12;

pub const HEADER_HEIGHT: i32 = 36;
pub const BRIGHTNESS_CARD_HEIGHT: i32 = 96;
pub const WARMTH_CARD_HEIGHT: i32 = 88;
pub const AUTOSTART_CARD_HEIGHT: i32 = 52;

pub const TRACK_HEIGHT: i32 = 8;
pub const THUMB_RADIUS: i32 = 9;

pub const PRESET_LABEL_WIDTH: i32 = 70;
pub const PRESET_HEIGHT: i32 = 28;
pub const PRESET_GAP: i32 = 8;

pub const TOGGLE_WIDTH: i32 = 44;
pub const TOGGLE_HEIGHT: i32 = 24;

// ── Fonts (logical units, negative for character height) ────────────────────

pub const FONT_SIZE_TITLE: i32 = -18;
pub const FONT_SIZE_SMALL: i32 = -12;
pub const FONT_SIZE_XS: i32 = -11;

pub const FONT_NAME: &str = "Segoe UI";
