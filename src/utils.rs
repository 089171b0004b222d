//! Utility functions and helpers
//!
//! Hash rate arithmetic, duration formatting and logging setup.

use crate::config::{LogFormat, LogLevel};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compute hash rate over a time period
pub fn compute_hash_rate(hashes: u64, elapsed: Duration) -> f64 {
    if elapsed.as_secs_f64() > 0.0 {
        hashes as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    }
}

/// Format a duration as a human-readable string, rounded to milliseconds
pub fn format_duration(elapsed: Duration) -> String {
    let rounded = Duration::from_millis(elapsed.as_millis() as u64);
    humantime::format_duration(rounded).to_string()
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so stdout only carries the report.
pub fn init_logging(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}
