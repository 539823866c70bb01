use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{CollectorError, Result};
use crate::settings::LoggingSettings;

/// Install the global tracing subscriber: a console layer on stderr plus a
/// plain-text layer appending to the configured log file. `verbose`
/// overrides the configured level with `debug`.
pub fn init_logging(settings: &LoggingSettings, verbose: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else {
        settings.level.as_str()
    };
    let filter =
        EnvFilter::try_new(level).map_err(|e| CollectorError::Logging(e.to_string()))?;

    if let Some(parent) = settings.log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init()
        .map_err(|e| CollectorError::Logging(e.to_string()))?;

    Ok(())
}
