//! Process-wide `tracing` setup for the binaries.

use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the directory of the log files.
pub const LOG_DIR_ENV: &str = "PROTOWEAVE_LOG_DIR";

/// `$PROTOWEAVE_LOG_DIR`, or `.protoweave/logs` in the home directory.
pub fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
    PathBuf::from(home).join(".protoweave").join("logs")
}

/// Writes the events of `component` to a daily file and, if asked, to stderr.
///
/// `RUST_LOG` selects what goes to the file (`info` by default). Stderr only gets
/// warnings and errors so that it stays readable next to the compiler output.
/// Keep the returned guard alive until the process ends, or buffered lines are lost.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("cannot create log directory {}: {e}", dir.display());
    }

    // e.g. cli.log.2026-10-19
    let appender = tracing_appender::rolling::daily(&dir, format!("{component}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(LevelFilter::WARN)
    });

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("a global subscriber is already installed, {component} logs go there");
    }
    guard
}
