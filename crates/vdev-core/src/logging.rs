//! Logging configuration using tracing
//!
//! All diagnostics go to a rolling log file; stdout/stderr stay reserved for
//! the CLI's own output.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `<local data dir>/vdev/logs/`.
/// Log level is controlled by the `VDEV_LOG` environment variable.
///
/// # Examples
/// ```bash
/// VDEV_LOG=debug vdev list
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "vdev.log");

    // Default to info, allow override via VDEV_LOG
    let env_filter =
        EnvFilter::try_from_env("VDEV_LOG").unwrap_or_else(|_| EnvFilter::new("vdev=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::debug!("logging to {}", log_dir.display());

    Ok(())
}

fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("vdev").join("logs")
}
