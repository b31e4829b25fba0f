//! The logging-initialisation hook.
//!
//! Diagnostics are emitted through the `log` facade throughout; this hook
//! installs a process-wide `env_logger` backend at a chosen level. Library
//! users with their own logger can skip it entirely.
use log::LevelFilter;

/// Initialise the process-wide logger at the given level.
///
/// `level` must be one of `trace`, `debug`, `info`, `warn` or `error`.
/// Returns `false` when the level is not one of these, or when a logger is
/// already installed (the existing logger keeps receiving our diagnostics).
/// ```
/// use giga_hspice_core::logging::init_logging;
///
/// assert!(!init_logging("verbose"));
/// ```
pub fn init_logging(level: &str) -> bool {
    let filter = match level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => return false,
    };
    env_logger::Builder::new()
        .filter_level(filter)
        .format_timestamp(None)
        .try_init()
        .is_ok()
}
