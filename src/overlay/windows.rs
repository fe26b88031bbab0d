// Win32 overlay backend using layered, click-through, topmost popup windows.
//
// Every input/visual property is part of the CreateWindowExW call:
//   • WS_EX_LAYERED      per-window alpha via SetLayeredWindowAttributes
//   • WS_EX_TRANSPARENT  mouse input falls through to the window beneath
//   • WS_EX_TOPMOST      lives in the topmost z-band
//   • WS_EX_TOOLWINDOW   hidden from taskbar and Alt+Tab
//   • WS_EX_NOACTIVATE + WS_DISABLED  never takes focus or keyboard input
// The window is shown only after alpha 0 is set, so it never flashes.
//
// The tint lives in GWLP_USERDATA as a COLORREF and is painted on WM_ERASEBKGND.

use std::ffi::c_void;

use windows::core::PCWSTR;
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    CreateSolidBrush, DeleteObject, EnumDisplayMonitors, FillRect, GetMonitorInfoW,
    InvalidateRect, HDC, HGDIOBJ, HMONITOR, MONITORINFO,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetClientRect, GetWindowLongPtrW, IsWindow,
    RegisterClassW, SetLayeredWindowAttributes, SetWindowLongPtrW, SetWindowPos, ShowWindow,
    CS_HREDRAW, CS_VREDRAW, GWLP_USERDATA, HWND_TOPMOST, LWA_ALPHA, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSENDCHANGING, SWP_NOSIZE, SW_HIDE, SW_SHOWNOACTIVATE, WM_ERASEBKGND, WNDCLASSW,
    WS_DISABLED, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST,
    WS_EX_TRANSPARENT, WS_POPUP,
};

use super::{OverlayBackend, OverlaySurface};
use crate::blend::Color;
use crate::error::{DimmerError, Result};
use crate::monitor::{Monitor, MonitorId, MonitorSource, Rect};

const CLASS_NAME: &str = "ScreenDimmerOverlay\0";
const MONITORINFOF_PRIMARY: u32 = 0x1;

pub fn colorref(c: Color) -> COLORREF {
    COLORREF(u32::from(c.r) | (u32::from(c.g) << 8) | (u32::from(c.b) << 16))
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_ERASEBKGND {
        let hdc = HDC(wparam.0 as *mut c_void);
        let tint = COLORREF(GetWindowLongPtrW(hwnd, GWLP_USERDATA) as u32);
        let mut client = RECT::default();
        let _ = GetClientRect(hwnd, &mut client);
        let brush = CreateSolidBrush(tint);
        FillRect(hdc, &client, brush);
        let _ = DeleteObject(HGDIOBJ::from(brush));
        return LRESULT(1);
    }
    DefWindowProcW(hwnd, msg, wparam, lparam)
}

/// Creates overlay windows on the calling (UI) thread
pub struct Win32OverlayBackend {
    class_registered: bool,
}

impl Win32OverlayBackend {
    pub fn new() -> Self {
        Self {
            class_registered: false,
        }
    }

    fn register_class(&mut self) -> bool {
        if self.class_registered {
            return true;
        }

        unsafe {
            let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap_or_default();
            let class_name: Vec<u16> = CLASS_NAME.encode_utf16().collect();

            let wc = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(window_proc),
                hInstance: hinstance.into(),
                lpszClassName: PCWSTR(class_name.as_ptr()),
                ..Default::default()
            };

            self.class_registered = RegisterClassW(&wc) != 0;
        }
        self.class_registered
    }
}

impl Default for Win32OverlayBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayBackend for Win32OverlayBackend {
    type Surface = Win32Surface;

    fn create_surface(&mut self, rect: Rect) -> Result<Win32Surface> {
        if !self.register_class() {
            return Err(DimmerError::CreateOverlay {
                rect,
                reason: "window class registration failed".into(),
            });
        }

        unsafe {
            let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap_or_default();
            let class_name: Vec<u16> = CLASS_NAME.encode_utf16().collect();

            let hwnd = CreateWindowExW(
                WS_EX_LAYERED
                    | WS_EX_TRANSPARENT
                    | WS_EX_TOPMOST
                    | WS_EX_TOOLWINDOW
                    | WS_EX_NOACTIVATE,
                PCWSTR(class_name.as_ptr()),
                PCWSTR::null(),
                WS_POPUP | WS_DISABLED,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                None,
                None,
                Some(hinstance.into()),
                None,
            )
            .map_err(|e| DimmerError::CreateOverlay {
                rect,
                reason: e.to_string(),
            })?;

            SetWindowLongPtrW(hwnd, GWLP_USERDATA, colorref(Color::BLACK).0 as isize);
            let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), 0, LWA_ALPHA);
            let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);

            tracing::debug!(%rect, "Created overlay window");
            Ok(Win32Surface {
                hwnd: hwnd.0 as isize,
            })
        }
    }
}

/// Handle to one overlay window
pub struct Win32Surface {
    hwnd: isize,
}

impl Win32Surface {
    fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut c_void)
    }

    fn reassert_topmost(&self) {
        unsafe {
            let _ = SetWindowPos(
                self.hwnd(),
                Some(HWND_TOPMOST),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_NOSENDCHANGING,
            );
        }
    }
}

impl OverlaySurface for Win32Surface {
    fn apply(&mut self, tint: Color, opacity: f64) {
        let hwnd = self.hwnd();
        let alpha = (opacity * 255.0) as u8;
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, colorref(tint).0 as isize);
            let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), alpha, LWA_ALPHA);
            let _ = InvalidateRect(Some(hwnd), None, true);
        }
        self.reassert_topmost();
    }

    fn is_alive(&self) -> bool {
        unsafe { IsWindow(Some(self.hwnd())).as_bool() }
    }

    fn release(&mut self) {
        let hwnd = self.hwnd();
        unsafe {
            if IsWindow(Some(hwnd)).as_bool() {
                let _ = ShowWindow(hwnd, SW_HIDE);
                let _ = DestroyWindow(hwnd);
            }
        }
    }
}

/// Enumerates displays with EnumDisplayMonitors
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32MonitorSource;

unsafe extern "system" fn collect_monitor(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprect: *mut RECT,
    lparam: LPARAM,
) -> windows::core::BOOL {
    let monitors = &mut *(lparam.0 as *mut Vec<Monitor>);

    let mut mi = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    if GetMonitorInfoW(hmonitor, &mut mi).as_bool() {
        let r = mi.rcMonitor;
        monitors.push(Monitor {
            id: MonitorId(hmonitor.0 as isize),
            rect: Rect::new(r.left, r.top, r.right - r.left, r.bottom - r.top),
            primary: mi.dwFlags & MONITORINFOF_PRIMARY != 0,
        });
    }

    windows::core::BOOL::from(true)
}

impl MonitorSource for Win32MonitorSource {
    fn monitors(&self) -> Vec<Monitor> {
        let mut monitors: Vec<Monitor> = Vec::new();
        unsafe {
            let _ = EnumDisplayMonitors(
                None,
                None,
                Some(collect_monitor),
                LPARAM(&mut monitors as *mut Vec<Monitor> as isize),
            );
        }
        monitors
    }
}
