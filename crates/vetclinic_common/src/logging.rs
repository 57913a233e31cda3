//! Logging setup for the VetClinic backend.
//!
//! Every crate logs through the `tracing` macros; the binary installs the
//! subscriber once at startup with [`init_with_level`] or
//! [`init_from_config`].

use std::str::FromStr;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are kept and the VetClinic crates are raised to
/// `level`. Calling this twice is harmless; the second call is ignored.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    for target in ["vetclinic", "tower_http"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from the optional `server.log_level` setting.
///
/// Unknown level names fall back to INFO with a warning.
pub fn init_from_config(log_level: Option<&str>) {
    let parsed = log_level.map(|raw| (raw, Level::from_str(raw.trim())));
    match parsed {
        Some((_, Ok(level))) => init_with_level(level),
        Some((raw, Err(_))) => {
            init();
            warn!("Unknown log level '{}', using INFO", raw);
        }
        None => init(),
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
