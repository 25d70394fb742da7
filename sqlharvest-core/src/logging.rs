//! Logging setup for the SQLHarvest binary.
//!
//! Log lines are the only user-visible record of per-target and per-file
//! failures, so the default level is INFO.

use crate::Result;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the level filter from an optional `RUST_LOG`-style directive string.
///
/// Falls back to [`DEFAULT_LOG_FILTER`] when `directives` is `None` or does
/// not parse.
#[must_use]
pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initializes structured logging on stdout.
///
/// The level comes from `RUST_LOG`, defaulting to INFO. Colors are only used
/// when stdout is a terminal.
///
/// # Errors
///
/// Returns a configuration error if a global subscriber is already installed.
///
/// # Example
/// ```rust,no_run
/// use sqlharvest_core::logging::init_logging;
///
/// init_logging().expect("Failed to initialize logging");
/// ```
pub fn init_logging() -> Result<()> {
    let directives = std::env::var("RUST_LOG").ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives.as_deref()))
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            crate::error::HarvestError::configuration(format!(
                "Failed to initialize logging: {}",
                e
            ))
        })?;

    Ok(())
}
