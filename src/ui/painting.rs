// GDI owner-draw rendering of the control panel. Geometry comes from
// `UiState`; this module only paints it.

use super::controls::*;
use super::theme::*;
use crate::blend::{blend, Color, Palette};
use crate::hotkeys;
use crate::monitor::Rect;
use crate::overlay::windows::colorref;
use crate::state::MAX_BRIGHTNESS;
use windows::Win32::Foundation::{RECT, SIZE};
use windows::Win32::Graphics::Gdi::*;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn win_rect(r: Rect) -> RECT {
    RECT {
        left: r.x,
        top: r.y,
        right: r.right(),
        bottom: r.bottom(),
    }
}

fn create_font(size: i32, weight: i32) -> HFONT {
    let face: Vec<u16> = FONT_NAME.encode_utf16().chain(std::iter::once(0)).collect();
    unsafe {
        let mut lf = LOGFONTW {
            lfHeight: size,
            lfWeight: weight,
            lfQuality: CLEARTYPE_QUALITY,
            lfCharSet: DEFAULT_CHARSET,
            ..Default::default()
        };
        let len = face.len().min(32);
        lf.lfFaceName[..len].copy_from_slice(&face[..len]);
        CreateFontIndirectW(&lf)
    }
}

fn fill_rect(hdc: HDC, r: &RECT, color: Color) {
    unsafe {
        let brush = CreateSolidBrush(colorref(color));
        FillRect(hdc, r, brush);
        let _ = DeleteObject(HGDIOBJ::from(brush));
    }
}

fn draw_rounded_rect(hdc: HDC, r: Rect, radius: i32, fill: Color, border: Color) {
    unsafe {
        let fill_brush = CreateSolidBrush(colorref(fill));
        let border_pen = CreatePen(PS_SOLID, 1, colorref(border));
        let old_brush = SelectObject(hdc, HGDIOBJ::from(fill_brush));
        let old_pen = SelectObject(hdc, HGDIOBJ::from(border_pen));
        let _ = RoundRect(hdc, r.x, r.y, r.right(), r.bottom(), radius, radius);
        SelectObject(hdc, old_pen);
        SelectObject(hdc, old_brush);
        let _ = DeleteObject(HGDIOBJ::from(fill_brush));
        let _ = DeleteObject(HGDIOBJ::from(border_pen));
    }
}

fn draw_text(hdc: HDC, text: &str, x: i32, y: i32, color: Color, font: HFONT) {
    unsafe {
        let old_font = SelectObject(hdc, HGDIOBJ::from(font));
        SetTextColor(hdc, colorref(color));
        SetBkMode(hdc, TRANSPARENT);
        let wide: Vec<u16> = text.encode_utf16().collect();
        let _ = TextOutW(hdc, x, y, &wide);
        SelectObject(hdc, old_font);
    }
}

fn measure_text(hdc: HDC, text: &str, font: HFONT) -> (i32, i32) {
    unsafe {
        let old_font = SelectObject(hdc, HGDIOBJ::from(font));
        let wide: Vec<u16> = text.encode_utf16().collect();
        let mut size = SIZE::default();
        let _ = GetTextExtentPoint32W(hdc, &wide, &mut size);
        SelectObject(hdc, old_font);
        (size.cx, size.cy)
    }
}

fn draw_text_right(hdc: HDC, text: &str, right_x: i32, y: i32, color: Color, font: HFONT) {
    let (w, _) = measure_text(hdc, text, font);
    draw_text(hdc, text, right_x - w, y, color, font);
}

fn draw_circle(hdc: HDC, cx: i32, cy: i32, r: i32, fill: Color, border: Color) {
    unsafe {
        let brush = CreateSolidBrush(colorref(fill));
        let pen = CreatePen(PS_SOLID, 1, colorref(border));
        let old_brush = SelectObject(hdc, HGDIOBJ::from(brush));
        let old_pen = SelectObject(hdc, HGDIOBJ::from(pen));
        let _ = Ellipse(hdc, cx - r, cy - r, cx + r, cy + r);
        SelectObject(hdc, old_pen);
        SelectObject(hdc, old_brush);
        let _ = DeleteObject(HGDIOBJ::from(brush));
        let _ = DeleteObject(HGDIOBJ::from(pen));
    }
}

// ── Main paint function ─────────────────────────────────────────────────────

pub fn paint(hdc: HDC, client: &RECT, ui: &UiState, palette: &Palette) {
    fill_rect(hdc, client, CLR_BACKGROUND);

    let fonts = Fonts::create();

    draw_header(hdc, &fonts);
    draw_brightness_card(hdc, ui, &fonts);
    draw_presets(hdc, ui, &fonts);
    draw_warmth_card(hdc, ui, palette, &fonts);
    draw_autostart_card(hdc, ui, &fonts);

    let (hw, _) = measure_text(hdc, hotkeys::HINT, fonts.xs);
    draw_text(
        hdc,
        hotkeys::HINT,
        PADDING + (CONTENT_WIDTH - hw) / 2,
        ui.footer_y,
        CLR_MUTED_FG,
        fonts.xs,
    );

    if ui.toast_visible {
        draw_toast(hdc, client, &ui.toast_message, &fonts);
    }

    fonts.destroy();
}

// ── Font cache ──────────────────────────────────────────────────────────────

struct Fonts {
    title: HFONT,
    small_bold: HFONT,
    xs: HFONT,
}

impl Fonts {
    fn create() -> Self {
        Self {
            title: create_font(FONT_SIZE_TITLE, 600),
            small_bold: create_font(FONT_SIZE_SMALL, 500),
            xs: create_font(FONT_SIZE_XS, 400),
        }
    }

    fn destroy(&self) {
        unsafe {
            let _ = DeleteObject(HGDIOBJ::from(self.title));
            let _ = DeleteObject(HGDIOBJ::from(self.small_bold));
            let _ = DeleteObject(HGDIOBJ::from(self.xs));
        }
    }
}

// ── Section renderers ───────────────────────────────────────────────────────

fn draw_header(hdc: HDC, fonts: &Fonts) {
    let right = PADDING + CONTENT_WIDTH;
    draw_text(hdc, "Screen Dimmer", PADDING, PADDING, CLR_FOREGROUND, fonts.title);

    let rule_y = PADDING + HEADER_HEIGHT;
    unsafe {
        let pen = CreatePen(PS_SOLID, 1, colorref(CLR_BORDER));
        let old_pen = SelectObject(hdc, HGDIOBJ::from(pen));
        let _ = MoveToEx(hdc, PADDING, rule_y, None);
        let _ = LineTo(hdc, right, rule_y);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(HGDIOBJ::from(pen));
    }
}

fn draw_brightness_card(hdc: HDC, ui: &UiState, fonts: &Fonts) {
    let card = ui.brightness_card;
    let inner_x = card.x + CARD_INSET;
    let inner_right = card.right() - CARD_INSET;
    draw_rounded_rect(hdc, card, CARD_RADIUS, CLR_CARD, CLR_BORDER);

    draw_text(
        hdc,
        "Dimming Level",
        inner_x,
        card.y + 14,
        CLR_FOREGROUND,
        fonts.small_bold,
    );

    // Badge
    let badge_text = format!("{}%", ui.brightness.value);
    let (bw, bh) = measure_text(hdc, &badge_text, fonts.xs);
    let badge = Rect::new(inner_right - (bw + 20), card.y + 12, bw + 20, bh + 4);
    draw_rounded_rect(hdc, badge, badge.height / 2, CLR_ACCENT, CLR_ACCENT);
    draw_text(
        hdc,
        &badge_text,
        badge.x + (badge.width - bw) / 2,
        badge.y + (badge.height - bh) / 2,
        CLR_BACKGROUND,
        fonts.xs,
    );

    let track = ui.brightness.rect;
    draw_rounded_rect(hdc, track, TRACK_HEIGHT / 2, CLR_SECONDARY, CLR_SECONDARY);
    let fill_w = ui.brightness.fill_width();
    if fill_w > 0 {
        let fill = Rect::new(track.x, track.y, fill_w, track.height);
        draw_rounded_rect(hdc, fill, TRACK_HEIGHT / 2, CLR_ACCENT, CLR_ACCENT);
    }
    draw_circle(
        hdc,
        ui.brightness.thumb_x(),
        track.y + track.height / 2,
        THUMB_RADIUS,
        CLR_FOREGROUND,
        CLR_FOREGROUND,
    );

    let label_y = track.bottom() + 6;
    draw_text(hdc, "0%", track.x, label_y, CLR_MUTED_FG, fonts.xs);
    draw_text_right(
        hdc,
        &format!("{MAX_BRIGHTNESS}%"),
        track.right(),
        label_y,
        CLR_MUTED_FG,
        fonts.xs,
    );
}

fn draw_presets(hdc: HDC, ui: &UiState, fonts: &Fonts) {
    let row = ui.presets_row;
    let (_, lh) = measure_text(hdc, "Presets", fonts.xs);
    draw_text(
        hdc,
        "Presets",
        row.x,
        row.y + (row.height - lh) / 2,
        CLR_MUTED_FG,
        fonts.xs,
    );

    for button in &ui.presets {
        let active = ui.brightness.value == button.preset.brightness();
        let (fill, text) = if active {
            (CLR_ACCENT, CLR_BACKGROUND)
        } else {
            (CLR_SECONDARY, CLR_FOREGROUND)
        };
        let r = button.rect;
        draw_rounded_rect(hdc, r, CARD_RADIUS, fill, fill);

        let label = button.preset.label();
        let (tw, th) = measure_text(hdc, label, fonts.xs);
        draw_text(
            hdc,
            label,
            r.x + (r.width - tw) / 2,
            r.y + (r.height - th) / 2,
            text,
            fonts.xs,
        );
    }
}

fn draw_warmth_card(hdc: HDC, ui: &UiState, palette: &Palette, fonts: &Fonts) {
    let card = ui.warmth_card;
    draw_rounded_rect(hdc, card, CARD_RADIUS, CLR_CARD, CLR_BORDER);
    draw_text(
        hdc,
        "Color Temperature",
        card.x + CARD_INSET,
        card.y + 14,
        CLR_FOREGROUND,
        fonts.small_bold,
    );

    // The track previews the overlay tint from cool to warm
    let track = ui.warmth.rect;
    for i in 0..track.width {
        let fraction = f64::from(i) / f64::from((track.width - 1).max(1));
        let strip = RECT {
            left: track.x + i,
            top: track.y,
            right: track.x + i + 1,
            bottom: track.bottom(),
        };
        fill_rect(hdc, &strip, blend(palette.cool, palette.warm, fraction));
    }
    draw_circle(
        hdc,
        ui.warmth.thumb_x(),
        track.y + track.height / 2,
        THUMB_RADIUS,
        CLR_FOREGROUND,
        CLR_BORDER,
    );

    let label_y = track.bottom() + 6;
    draw_text(hdc, "Neutral", track.x, label_y, CLR_MUTED_FG, fonts.xs);
    draw_text_right(hdc, "Warm", track.right(), label_y, CLR_MUTED_FG, fonts.xs);
}

fn draw_autostart_card(hdc: HDC, ui: &UiState, fonts: &Fonts) {
    let card = ui.autostart_card;
    draw_rounded_rect(hdc, card, CARD_RADIUS, CLR_CARD, CLR_BORDER);

    let (_, th) = measure_text(hdc, "Start with Windows", fonts.small_bold);
    draw_text(
        hdc,
        "Start with Windows",
        card.x + CARD_INSET,
        card.y + (card.height - th) / 2,
        CLR_FOREGROUND,
        fonts.small_bold,
    );
    draw_toggle(hdc, &ui.autostart);
}

fn draw_toggle(hdc: HDC, toggle: &ToggleState) {
    let r = toggle.rect;
    let track_color = if toggle.checked {
        CLR_ACCENT
    } else {
        CLR_SECONDARY
    };
    draw_rounded_rect(hdc, r, r.height, track_color, track_color);

    let knob_r = r.height / 2 - 2;
    let knob_x = if toggle.checked {
        r.right() - 2 - knob_r
    } else {
        r.x + 2 + knob_r
    };
    draw_circle(
        hdc,
        knob_x,
        r.y + r.height / 2,
        knob_r,
        CLR_FOREGROUND,
        CLR_FOREGROUND,
    );
}

fn draw_toast(hdc: HDC, client: &RECT, message: &str, fonts: &Fonts) {
    if message.is_empty() {
        return;
    }

    let (tw, th) = measure_text(hdc, message, fonts.small_bold);
    let width = (tw + 32).min(client.right - 2 * PADDING);
    let height = th + 20;
    let toast = Rect::new(
        (client.right - width) / 2,
        client.bottom - height - 16,
        width,
        height,
    );
    draw_rounded_rect(hdc, toast, CARD_RADIUS, CLR_FOREGROUND, CLR_FOREGROUND);
    draw_text(
        hdc,
        message,
        toast.x + (width - tw).max(0) / 2,
        toast.y + (height - th) / 2,
        CLR_BACKGROUND,
        fonts.small_bold,
    );
}
