use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_DIR_ENV: &str = "RESCOPE_LOG_DIR";

/// `$RESCOPE_LOG_DIR`, else `~/.rescope/logs`.
pub fn default_log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rescope")
        .join("logs")
}

pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    init_logging_in(&default_log_dir(), component, to_stderr)
}

/// Installs the global subscriber writing to `log_dir`. A subscriber that
/// is already installed is left in place.
pub fn init_logging_in(log_dir: &Path, component: &str, to_stderr: bool) -> WorkerGuard {
    let _ = std::fs::create_dir_all(log_dir);

    // Roll daily, with the component name as the prefix
    // This will create files like resolver.log.2024-01-21
    let file_appender = tracing_appender::rolling::daily(log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // File layer: no ANSI colors, output to file
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        let _ = registry.with(stderr_layer).try_init();
    } else {
        let _ = registry.try_init();
    }

    guard
}
