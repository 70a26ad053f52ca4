//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber once per process
//! - Pick the output format (pretty or JSON) from configuration
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - A second initialization is a no-op rather than a panic, so tests and
//!   both binaries can share the same entry point

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::schema::{LogFormat, ObservabilityConfig};

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docket={}", config.log_level)));

    let layer = match config.log_format {
        LogFormat::Pretty => fmt::layer().with_target(false).boxed(),
        LogFormat::Json => fmt::layer().with_ansi(false).json().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}
