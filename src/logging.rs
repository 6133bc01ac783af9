//! `tracing-subscriber` setup for the binary.
//!
//! Logs go to stderr so that `--json` output on stdout stays parseable.

use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{LiminalError, Result};

/// Overrides the computed filter, e.g. `LIMINALDB_LOG=liminaldb=trace,reqwest=debug`.
pub const ENV_LOG_FILTER: &str = "LIMINALDB_LOG";

pub fn init(verbose: bool) -> Result<()> {
    let filter = build_filter(std::env::var(ENV_LOG_FILTER).ok(), verbose)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(verbose)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LiminalError::Configuration(format!("Failed to initialize logging: {e}")))
}

fn build_filter(custom: Option<String>, verbose: bool) -> Result<EnvFilter> {
    let directives = match custom.filter(|f| !f.trim().is_empty()) {
        Some(custom) => custom,
        None => {
            let level = if verbose { "debug" } else { "warn" };
            format!("{}={level},hyper=warn,reqwest=warn", env!("CARGO_PKG_NAME"))
        }
    };
    EnvFilter::try_new(&directives)
        .map_err(|e| LiminalError::Configuration(format!("Invalid log filter {directives}: {e}")))
}
