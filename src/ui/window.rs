// Control panel window and the UI-thread message loop.
//
// The window doubles as the message sink for hotkeys, the tray icon,
// display changes, timers and commands posted from other threads. Every one
// of those is turned into a `Command` and handed to `App::dispatch`.

use std::cell::RefCell;
use std::ffi::c_void;

use windows::core::{Result as WinResult, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::*;

use super::controls::UiState;
use super::painting;
use super::theme::*;
use crate::app::App;
use crate::command::{Command, CommandSink, Flow};
use crate::overlay::windows::{colorref, Win32MonitorSource, Win32OverlayBackend};
use crate::{hotkeys, tray};

pub type Win32App = App<Win32OverlayBackend, Win32MonitorSource>;

const CLASS_NAME: &str = "ScreenDimmerControls\0";
const WM_APP_COMMAND: u32 = WM_APP + 1;
const TOAST_TIMER_ID: usize = 100;
const WATCHDOG_TIMER_ID: usize = 101;
const TOAST_MS: u32 = 2500;
const WATCHDOG_MS: u32 = 5000;

/// Stored behind GWLP_USERDATA for the lifetime of the message loop
struct WndState {
    app: RefCell<Win32App>,
    ui: RefCell<UiState>,
}

/// Posts commands onto the control window's message queue.
/// Safe to use from any thread.
#[derive(Debug, Clone, Copy)]
pub struct WindowSink {
    hwnd: isize,
}

impl WindowSink {
    fn new(hwnd: HWND) -> Self {
        Self {
            hwnd: hwnd.0 as isize,
        }
    }
}

impl CommandSink for WindowSink {
    fn post(&self, command: Command) {
        let hwnd = HWND(self.hwnd as *mut c_void);
        let (tag, payload) = command.to_words();
        let posted = unsafe {
            PostMessageW(
                Some(hwnd),
                WM_APP_COMMAND,
                WPARAM(tag),
                LPARAM(payload),
            )
        };
        if let Err(e) = posted {
            tracing::warn!(?command, error = %e, "Could not post command");
        }
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn create_window() -> WinResult<HWND> {
    let class_name = wide(CLASS_NAME);

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null())?;

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hbrBackground: CreateSolidBrush(colorref(CLR_BACKGROUND)),
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            hIcon: LoadIconW(None, IDI_APPLICATION).unwrap_or_default(),
            ..Default::default()
        };
        RegisterClassW(&wc);

        // Size the frame so the client area matches the layout
        let mut wr = RECT {
            left: 0,
            top: 0,
            right: WINDOW_WIDTH,
            bottom: WINDOW_HEIGHT,
        };
        let style = WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX;
        let _ = AdjustWindowRectEx(&mut wr, style, false, WINDOW_EX_STYLE::default());

        let title = wide("Screen Dimmer");
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            PCWSTR(class_name.as_ptr()),
            PCWSTR(title.as_ptr()),
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            wr.right - wr.left,
            wr.bottom - wr.top,
            None,
            None,
            Some(hinstance.into()),
            None,
        )
    }
}

/// Create the control panel, tray icon and hotkeys, show the overlays and
/// pump messages until exit. Tears everything down before returning.
pub fn run(app: Win32App) -> WinResult<()> {
    let ui = UiState::new(app.state(), app.autostart_enabled());
    let hwnd = create_window()?;

    let state = Box::into_raw(Box::new(WndState {
        app: RefCell::new(app),
        ui: RefCell::new(ui),
    }));

    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, state as isize);
        let state = &*state;

        if !tray::add_tray_icon(hwnd) {
            tracing::warn!("Could not add tray icon");
        }

        {
            let mut app = state.app.borrow_mut();
            for failure in hotkeys::register_all(hwnd) {
                app.report(&failure);
            }
            app.start(WindowSink::new(hwnd));
        }

        SetTimer(Some(hwnd), WATCHDOG_TIMER_ID, WATCHDOG_MS, None);
        show_window(hwnd);
        refresh(hwnd, state, false);

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
        tracing::info!("Message loop finished");

        teardown(hwnd, &mut state.app.borrow_mut());
    }

    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
        drop(Box::from_raw(state));
        let _ = DestroyWindow(hwnd);
    }
    Ok(())
}

/// Release everything system-wide in order: hotkeys, tray icon, then the
/// app itself (overlays and settings). Runs once.
fn teardown(hwnd: HWND, app: &mut Win32App) {
    if app.is_shut_down() {
        return;
    }
    unsafe {
        let _ = KillTimer(Some(hwnd), WATCHDOG_TIMER_ID);
        let _ = KillTimer(Some(hwnd), TOAST_TIMER_ID);
    }
    hotkeys::unregister_all(hwnd);
    tray::remove_tray_icon(hwnd);
    app.shutdown();
}

fn show_window(hwnd: HWND) {
    unsafe {
        let _ = ShowWindow(hwnd, SW_RESTORE);
        let _ = SetForegroundWindow(hwnd);
    }
}

fn hide_window(hwnd: HWND) {
    unsafe {
        let _ = ShowWindow(hwnd, SW_HIDE);
    }
}

fn invalidate(hwnd: HWND) {
    unsafe {
        let _ = InvalidateRect(Some(hwnd), None, false);
    }
}

fn client_point(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    (x, y)
}

fn handle(hwnd: HWND, state: &WndState, command: Command) {
    let flow = match state.app.try_borrow_mut() {
        Ok(mut app) => app.dispatch(command),
        Err(_) => {
            // Re-entered from a Win32 call made during dispatch; retry from the queue
            WindowSink::new(hwnd).post(command);
            return;
        }
    };

    match flow {
        Flow::Continue => {}
        Flow::ShowControls => show_window(hwnd),
        Flow::Exit => unsafe { PostQuitMessage(0) },
    }
    refresh(hwnd, state, matches!(command, Command::SetAutostart(_)));
}

/// Mirror the app state into the widgets and surface pending notices
fn refresh(hwnd: HWND, state: &WndState, autostart_changed: bool) {
    let (dimmer, notices, autostart) = match state.app.try_borrow_mut() {
        Ok(mut app) => (
            app.state(),
            app.take_notices(),
            autostart_changed.then(|| app.autostart_enabled()),
        ),
        Err(_) => return,
    };
    let Ok(mut ui) = state.ui.try_borrow_mut() else {
        return;
    };

    ui.sync(dimmer);
    if let Some(enabled) = autostart {
        ui.autostart.checked = enabled;
    }

    let toast = match notices.into_iter().last() {
        Some(notice) => Some(notice),
        None if autostart_changed => Some("Autostart setting saved".to_string()),
        None => None,
    };
    if let Some(message) = toast {
        ui.show_toast(message);
        unsafe {
            SetTimer(Some(hwnd), TOAST_TIMER_ID, TOAST_MS, None);
        }
    }
    drop(ui);
    invalidate(hwnd);
}

fn paint(hwnd: HWND, state: &WndState) {
    unsafe {
        let mut ps = PAINTSTRUCT::default();
        let hdc = BeginPaint(hwnd, &mut ps);

        // Double-buffer to avoid flicker
        let mut client = RECT::default();
        let _ = GetClientRect(hwnd, &mut client);

        let mem_dc = CreateCompatibleDC(Some(hdc));
        let mem_bmp = CreateCompatibleBitmap(hdc, client.right, client.bottom);
        let old_bmp = SelectObject(mem_dc, HGDIOBJ::from(mem_bmp));

        let palette = state.app.try_borrow().ok().map(|app| *app.coordinator().palette());
        if let (Some(palette), Ok(ui)) = (palette, state.ui.try_borrow()) {
            painting::paint(mem_dc, &client, &ui, &palette);
        }

        let _ = BitBlt(
            hdc,
            0,
            0,
            client.right,
            client.bottom,
            Some(mem_dc),
            0,
            0,
            SRCCOPY,
        );

        SelectObject(mem_dc, old_bmp);
        let _ = DeleteObject(HGDIOBJ::from(mem_bmp));
        let _ = DeleteDC(mem_dc);
        let _ = EndPaint(hwnd, &ps);
    }
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const WndState;
    if ptr.is_null() {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }
    let state = &*ptr;

    match msg {
        WM_PAINT => {
            paint(hwnd, state);
            LRESULT(0)
        }

        // Handled in WM_PAINT with double buffering
        WM_ERASEBKGND => LRESULT(1),

        WM_LBUTTONDOWN => {
            let (x, y) = client_point(lparam);
            let (command, dragging) = match state.ui.try_borrow_mut() {
                Ok(mut ui) => (ui.press(x, y), ui.is_dragging()),
                Err(_) => return DefWindowProcW(hwnd, msg, wparam, lparam),
            };
            if dragging {
                SetCapture(hwnd);
            }
            match command {
                Some(command) => handle(hwnd, state, command),
                None => invalidate(hwnd),
            }
            LRESULT(0)
        }

        WM_MOUSEMOVE => {
            let (x, _) = client_point(lparam);
            let command = state
                .ui
                .try_borrow_mut()
                .ok()
                .and_then(|mut ui| ui.drag_to(x));
            if let Some(command) = command {
                handle(hwnd, state, command);
            }
            LRESULT(0)
        }

        WM_LBUTTONUP => {
            let ended = state
                .ui
                .try_borrow_mut()
                .map(|mut ui| ui.release())
                .unwrap_or(false);
            if ended {
                let _ = ReleaseCapture();
            }
            LRESULT(0)
        }

        WM_CAPTURECHANGED => {
            if let Ok(mut ui) = state.ui.try_borrow_mut() {
                ui.release();
            }
            LRESULT(0)
        }

        WM_COMMAND => {
            let id = (wparam.0 & 0xFFFF) as u32;
            if let Some(command) = tray::command_for_menu(id) {
                handle(hwnd, state, command);
            }
            LRESULT(0)
        }

        tray::WM_TRAY_ICON => {
            match (lparam.0 & 0xFFFF) as u32 {
                WM_LBUTTONUP | WM_LBUTTONDBLCLK => handle(hwnd, state, Command::ShowControls),
                WM_RBUTTONUP => tray::show_context_menu(hwnd),
                _ => {}
            }
            LRESULT(0)
        }

        WM_HOTKEY => {
            if let Some(command) = hotkeys::command_for(wparam.0 as i32) {
                handle(hwnd, state, command);
            }
            LRESULT(0)
        }

        WM_APP_COMMAND => {
            match Command::from_words(wparam.0, lparam.0) {
                Some(command) => handle(hwnd, state, command),
                None => tracing::warn!(
                    tag = wparam.0,
                    payload = lparam.0,
                    "Ignoring malformed command"
                ),
            }
            LRESULT(0)
        }

        WM_DISPLAYCHANGE => {
            match state.app.try_borrow() {
                Ok(app) => app.display_changed(),
                // The app is mid-dispatch; queue the rebuild directly
                Err(_) => WindowSink::new(hwnd).post(Command::RebuildOverlays),
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_TIMER => {
            match wparam.0 {
                TOAST_TIMER_ID => {
                    let _ = KillTimer(Some(hwnd), TOAST_TIMER_ID);
                    if let Ok(mut ui) = state.ui.try_borrow_mut() {
                        ui.hide_toast();
                    }
                    invalidate(hwnd);
                }
                WATCHDOG_TIMER_ID => handle(hwnd, state, Command::VerifyOverlays),
                _ => {}
            }
            LRESULT(0)
        }

        WM_SIZE => {
            if wparam.0 as u32 == SIZE_MINIMIZED {
                hide_window(hwnd);
            }
            LRESULT(0)
        }

        WM_ENDSESSION => {
            // No WM_QUIT follows when Windows is logging off
            if wparam.0 != 0 {
                match state.app.try_borrow_mut() {
                    Ok(mut app) => teardown(hwnd, &mut app),
                    Err(_) => tracing::warn!("Session ended during dispatch, settings not saved"),
                }
            }
            LRESULT(0)
        }

        WM_CLOSE => {
            PostQuitMessage(0);
            LRESULT(0)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
