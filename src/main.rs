// Prevents console window in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(windows)]
fn main() {
    use screen_dimmer::app::App;
    use screen_dimmer::autostart::RegistryAutostart;
    use screen_dimmer::config::JsonSettingsStore;
    use screen_dimmer::overlay::windows::{Win32MonitorSource, Win32OverlayBackend};
    use screen_dimmer::{logging, ui};

    let _log_guard = logging::init();

    let Some(_instance) = instance::acquire() else {
        tracing::info!("Another instance is already running");
        return;
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Screen Dimmer");

    let app = App::new(
        Win32OverlayBackend::new(),
        Win32MonitorSource,
        Box::new(JsonSettingsStore::default_location()),
        Box::new(RegistryAutostart),
    );

    if let Err(e) = ui::run(app) {
        tracing::error!(error = %e, "Could not create the control window");
        std::process::exit(1);
    }
    tracing::info!("Exited cleanly");
}

#[cfg(not(windows))]
fn main() {
    let _log_guard = screen_dimmer::logging::init();
    tracing::error!("Screen Dimmer needs Windows layered windows; nothing to do on this platform");
    std::process::exit(1);
}

#[cfg(windows)]
mod instance {
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE};
    use windows::Win32::System::Threading::CreateMutexW;

    const SINGLE_INSTANCE_MUTEX: &str = "ScreenDimmerMutex\0";

    /// Holds the named mutex for the life of the process
    pub struct InstanceGuard(HANDLE);

    impl Drop for InstanceGuard {
        fn drop(&mut self) {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }

    /// `None` if another instance already owns the mutex
    pub fn acquire() -> Option<InstanceGuard> {
        let name: Vec<u16> = SINGLE_INSTANCE_MUTEX.encode_utf16().collect();
        unsafe {
            let handle = match CreateMutexW(None, true, PCWSTR(name.as_ptr())) {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::warn!(error = %e, "Could not create instance mutex, running unguarded");
                    return Some(InstanceGuard(HANDLE::default()));
                }
            };
            if GetLastError() == ERROR_ALREADY_EXISTS {
                let _ = CloseHandle(handle);
                return None;
            }
            Some(InstanceGuard(handle))
        }
    }
}
