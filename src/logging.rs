//! # Structured Logging Module
//!
//! Console logging for the CLI and library consumers, initialised once per process.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging
///
/// `RUST_LOG` wins when set; otherwise the level follows `verbosity`
/// (0 = warn, 1 = info, 2 = debug, 3+ = trace). `CLAIMS_AUDIT_LOG_FORMAT=json`
/// switches the console output to JSON lines.
pub fn init_structured_logging(verbosity: u8) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level(verbosity)));

        let json = std::env::var("CLAIMS_AUDIT_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layer = if json {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        };

        // A subscriber installed by the host application takes precedence
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::debug!(verbosity = verbosity, json = json, "Structured logging initialized");
    });
}

fn log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
