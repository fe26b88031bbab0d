// System tray icon with context menu

use crate::command::Command;

pub const TOOLTIP: &str = "Screen Dimmer";

/// Menu item IDs
pub const IDM_SHOW: u32 = 1001;
pub const IDM_EXIT: u32 = 1002;

const MENU: [(u32, &str); 2] = [(IDM_SHOW, "Show Controls"), (IDM_EXIT, "Exit")];

/// Map a menu selection (WM_COMMAND low word) to its command
pub fn command_for_menu(id: u32) -> Option<Command> {
    match id {
        IDM_SHOW => Some(Command::ShowControls),
        IDM_EXIT => Some(Command::Exit),
        _ => None,
    }
}

#[cfg(windows)]
pub use win32::{add_tray_icon, remove_tray_icon, show_context_menu, WM_TRAY_ICON};

#[cfg(windows)]
mod win32 {
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{HWND, POINT};
    use windows::Win32::UI::Shell::{
        Shell_NotifyIconW, NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, LoadIconW, SetForegroundWindow,
        TrackPopupMenu, IDI_APPLICATION, MF_STRING, TPM_BOTTOMALIGN, TPM_LEFTALIGN, WM_APP,
    };

    use super::{MENU, TOOLTIP};

    /// Custom message ID for tray icon callbacks
    pub const WM_TRAY_ICON: u32 = WM_APP + 2;

    const TRAY_UID: u32 = 1;

    fn wide_str(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    /// Add the tray icon. Returns `false` if the shell refused it.
    pub fn add_tray_icon(hwnd: HWND) -> bool {
        unsafe {
            let mut nid = NOTIFYICONDATAW {
                cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                hWnd: hwnd,
                uID: TRAY_UID,
                uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP,
                uCallbackMessage: WM_TRAY_ICON,
                ..Default::default()
            };

            if let Ok(icon) = LoadIconW(None, IDI_APPLICATION) {
                nid.hIcon = icon;
            }

            let tip = wide_str(TOOLTIP);
            let len = tip.len().min(nid.szTip.len());
            nid.szTip[..len].copy_from_slice(&tip[..len]);

            Shell_NotifyIconW(NIM_ADD, &nid).as_bool()
        }
    }

    pub fn remove_tray_icon(hwnd: HWND) {
        unsafe {
            let nid = NOTIFYICONDATAW {
                cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                hWnd: hwnd,
                uID: TRAY_UID,
                ..Default::default()
            };
            let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
        }
    }

    /// Show the context menu at the cursor. The selection arrives as WM_COMMAND.
    pub fn show_context_menu(hwnd: HWND) {
        unsafe {
            let menu = match CreatePopupMenu() {
                Ok(menu) => menu,
                Err(e) => {
                    tracing::warn!(error = %e, "Could not create tray menu");
                    return;
                }
            };

            for (id, text) in MENU {
                let text = wide_str(text);
                let _ = AppendMenuW(menu, MF_STRING, id as usize, PCWSTR(text.as_ptr()));
            }

            let mut pt = POINT::default();
            let _ = GetCursorPos(&mut pt);

            // Required for the menu to close when the user clicks elsewhere
            let _ = SetForegroundWindow(hwnd);

            let _ = TrackPopupMenu(
                menu,
                TPM_LEFTALIGN | TPM_BOTTOMALIGN,
                pt.x,
                pt.y,
                Some(0),
                hwnd,
                None,
            );

            let _ = DestroyMenu(menu);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_commands() {
        assert_eq!(command_for_menu(IDM_SHOW), Some(Command::ShowControls));
        assert_eq!(command_for_menu(IDM_EXIT), Some(Command::Exit));
        assert_eq!(command_for_menu(0), None);
    }

    #[test]
    fn test_every_menu_item_maps_to_a_command() {
        for (id, label) in MENU {
            assert!(command_for_menu(id).is_some(), "{label} has no command");
        }
    }
}
