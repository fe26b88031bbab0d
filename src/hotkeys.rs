// Global hotkeys: Ctrl+Down / Ctrl+Up nudge the dimming level, Ctrl+Shift+X quits.
// Registration goes through Win32 RegisterHotKey; WM_HOTKEY ids map back to commands.

use crate::command::Command;

/// Hotkey IDs (must be unique within the application)
pub const HOTKEY_DECREASE: i32 = 1;
pub const HOTKEY_INCREASE: i32 = 2;
pub const HOTKEY_EXIT: i32 = 3;

/// One global binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub id: i32,
    pub label: &'static str,
    pub command: Command,
}

pub const BINDINGS: [Binding; 3] = [
    Binding {
        id: HOTKEY_DECREASE,
        label: "Ctrl+Down",
        command: Command::StepBrightness(-1),
    },
    Binding {
        id: HOTKEY_INCREASE,
        label: "Ctrl+Up",
        command: Command::StepBrightness(1),
    },
    Binding {
        id: HOTKEY_EXIT,
        label: "Ctrl+Shift+X",
        command: Command::Exit,
    },
];

/// Shown in the control panel footer
pub const HINT: &str = "Ctrl+\u{2191}/\u{2193} to adjust | Ctrl+Shift+X to exit";

/// Map a WM_HOTKEY id to its command
pub fn command_for(id: i32) -> Option<Command> {
    BINDINGS.iter().find(|b| b.id == id).map(|b| b.command)
}

#[cfg(windows)]
pub use win32::{register_all, unregister_all};

#[cfg(windows)]
mod win32 {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_CONTROL, MOD_NOREPEAT,
        MOD_SHIFT, VK_DOWN, VK_UP,
    };

    use super::{Binding, BINDINGS, HOTKEY_DECREASE, HOTKEY_INCREASE};
    use crate::error::DimmerError;

    const VK_X: u32 = 0x58;

    fn key_for(binding: &Binding) -> (HOT_KEY_MODIFIERS, u32) {
        match binding.id {
            HOTKEY_DECREASE => (MOD_CONTROL, u32::from(VK_DOWN.0)),
            HOTKEY_INCREASE => (MOD_CONTROL, u32::from(VK_UP.0)),
            _ => (
                HOT_KEY_MODIFIERS(MOD_CONTROL.0 | MOD_SHIFT.0 | MOD_NOREPEAT.0),
                VK_X,
            ),
        }
    }

    /// Register every binding. Failures (e.g. combo owned by another
    /// process) are returned; the remaining bindings still register.
    pub fn register_all(hwnd: HWND) -> Vec<DimmerError> {
        let mut failures = Vec::new();
        for binding in &BINDINGS {
            let (mods, vk) = key_for(binding);
            match unsafe { RegisterHotKey(Some(hwnd), binding.id, mods, vk) } {
                Ok(()) => tracing::info!(hotkey = binding.label, "Registered hotkey"),
                Err(e) => {
                    tracing::warn!(hotkey = binding.label, error = %e, "Failed to register hotkey");
                    failures.push(DimmerError::Hotkey {
                        binding: binding.label,
                        reason: e.to_string(),
                    });
                }
            }
        }
        failures
    }

    pub fn unregister_all(hwnd: HWND) {
        for binding in &BINDINGS {
            unsafe {
                let _ = UnregisterHotKey(Some(hwnd), binding.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_for() {
        assert_eq!(
            command_for(HOTKEY_DECREASE),
            Some(Command::StepBrightness(-1))
        );
        assert_eq!(command_for(HOTKEY_INCREASE), Some(Command::StepBrightness(1)));
        assert_eq!(command_for(HOTKEY_EXIT), Some(Command::Exit));
        assert_eq!(command_for(42), None);
    }

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in BINDINGS.iter().enumerate() {
            for b in &BINDINGS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
