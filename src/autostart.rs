// Start-at-login registration.
// On Windows this is a value under HKCU\Software\Microsoft\Windows\CurrentVersion\Run.

use crate::error::Result;

pub trait Autostart {
    fn is_enabled(&self) -> Result<bool>;
    fn set_enabled(&self, enabled: bool) -> Result<()>;
}

#[cfg(windows)]
pub use registry::RegistryAutostart;

#[cfg(windows)]
mod registry {
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, WIN32_ERROR};
    use windows::Win32::System::Registry::{
        RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
        HKEY_CURRENT_USER, KEY_READ, KEY_WRITE, REG_SAM_FLAGS, REG_SZ,
    };

    use super::Autostart;
    use crate::error::{DimmerError, Result};

    const RUN_KEY: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Run";
    const VALUE_NAME: &str = "ScreenDimmer";

    fn wide_string(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    fn registry_error(action: &str, code: WIN32_ERROR) -> DimmerError {
        DimmerError::Autostart(format!("{action} failed with code {}", code.0))
    }

    /// Closes the key when dropped
    struct RunKey(HKEY);

    impl RunKey {
        fn open(access: REG_SAM_FLAGS) -> Result<Self> {
            let key_path = wide_string(RUN_KEY);
            let mut hkey = HKEY::default();
            let status = unsafe {
                RegOpenKeyExW(
                    HKEY_CURRENT_USER,
                    PCWSTR(key_path.as_ptr()),
                    Some(0),
                    access,
                    &mut hkey,
                )
            };
            if status.is_ok() {
                Ok(Self(hkey))
            } else {
                Err(registry_error("opening the Run key", status))
            }
        }
    }

    impl Drop for RunKey {
        fn drop(&mut self) {
            unsafe {
                let _ = RegCloseKey(self.0);
            }
        }
    }

    /// Registers the running executable under the per-user Run key
    #[derive(Debug, Default, Clone, Copy)]
    pub struct RegistryAutostart;

    impl Autostart for RegistryAutostart {
        fn is_enabled(&self) -> Result<bool> {
            let key = RunKey::open(KEY_READ)?;
            let value_name = wide_string(VALUE_NAME);
            let status = unsafe {
                RegQueryValueExW(key.0, PCWSTR(value_name.as_ptr()), None, None, None, None)
            };
            if status.is_ok() {
                Ok(true)
            } else if status == ERROR_FILE_NOT_FOUND {
                Ok(false)
            } else {
                Err(registry_error("reading the Run value", status))
            }
        }

        fn set_enabled(&self, enabled: bool) -> Result<()> {
            let key = RunKey::open(KEY_WRITE)?;
            let value_name = wide_string(VALUE_NAME);

            if !enabled {
                let status = unsafe { RegDeleteValueW(key.0, PCWSTR(value_name.as_ptr())) };
                return if status.is_ok() || status == ERROR_FILE_NOT_FOUND {
                    Ok(())
                } else {
                    Err(registry_error("deleting the Run value", status))
                };
            }

            let exe_path = std::env::current_exe()
                .map_err(|e| DimmerError::Autostart(format!("executable path unknown: {e}")))?;
            let data = wide_string(&format!("\"{}\"", exe_path.display()));
            let data_bytes =
                unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, data.len() * 2) };

            let status = unsafe {
                RegSetValueExW(
                    key.0,
                    PCWSTR(value_name.as_ptr()),
                    Some(0),
                    REG_SZ,
                    Some(data_bytes),
                )
            };
            if status.is_ok() {
                Ok(())
            } else {
                Err(registry_error("writing the Run value", status))
            }
        }
    }
}
