//! Logging for cutsync.
//!
//! Two layers:
//! - `tracing` for library diagnostics, installed with [`init_tracing`]
//! - [`RunLogger`] for the human-readable log of one analysis run
//!
//! # Example
//!
//! ```no_run
//! use cutsync_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new("concert", ".logs", LogConfig::default(), None)?;
//! logger.phase("Clustering");
//! logger.command("ffmpeg -ss 0.000 -t 124.750 -i concert.mp4 ...");
//! # Ok::<(), std::io::Error>(())
//! ```

mod run_logger;
mod types;

pub use run_logger::{RunLogger, RunLoggerBuilder};
pub use types::{LineKind, LogCallback, LogConfig, LogLevel};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Call once at startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.filter_str()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Subscriber for unit tests: warnings and above, captured per test.
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
