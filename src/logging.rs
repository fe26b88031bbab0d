//! Logging setup.
//!
//! Writes to stdout and to `<config_dir>/ScreenDimmer/screen-dimmer.log`.
//! Release builds have no console, so the file is the only place failures
//! that the app absorbs (hotkeys, registry, overlay creation) show up.
//! The filter comes from `SCREEN_DIMMER_LOG`, then `RUST_LOG`, then `info`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config;

const LOG_FILE: &str = "screen-dimmer.log";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("SCREEN_DIMMER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging. Hold the returned guard until exit so buffered
/// lines are flushed. Falls back to stdout only when the log directory is
/// not writable.
pub fn init() -> Option<WorkerGuard> {
    let log_dir = config::app_dir();

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        init_stdout_only();
        tracing::warn!(error = %e, dir = ?log_dir, "Log directory unavailable, logging to stdout only");
        return None;
    }

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        &log_dir, LOG_FILE,
    ));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(true);

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter())
        .try_init()
        .is_err()
    {
        return None;
    }

    tracing::info!(log_file = ?log_dir.join(LOG_FILE), "Logging initialized");
    Some(guard)
}

fn init_stdout_only() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stdout).with_target(true))
        .with(filter())
        .try_init();
}
