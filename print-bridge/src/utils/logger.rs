//! Logging Infrastructure
//!
//! - Console output, pretty or JSON
//! - One append-only UTF-8 log file, read back by `/logs/tail`
//! - `security` target for rejected requests

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug"); `RUST_LOG` overrides it
/// * `json_format` - JSON console output instead of the pretty format
/// * `log_file` - Optional file every event is appended to
///
/// # Examples
/// ```ignore
/// // Console only
/// print_bridge::init_logger("debug", false, None)?;
///
/// // Console + file
/// print_bridge::init_logger("info", false, Some(Path::new("/var/lib/print-bridge/logs/print-bridge.log")))?;
/// ```
pub fn init_logger(level: &str, json_format: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .boxed()
    };

    let file_layer = match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Log path has no file name: {}", path.display()))?;
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            // Never rotates: the tail endpoint reads exactly this file
            let appender = tracing_appender::rolling::never(dir, name);
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(Mutex::new(appender)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install global logger")?;

    Ok(())
}
