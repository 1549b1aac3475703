//! Process-wide tracing setup
//!
//! The filter comes from the configured filter file, then `RUST_LOG`, then
//! `info`. Installation happens at most once per process.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::core::config::LoggingConfig;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Later calls are no-ops.
pub fn init(config: &LoggingConfig, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        resolve_filter(&config.filter_file)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Build the filter from `path` if it holds a valid directive
pub fn resolve_filter(path: &Path) -> EnvFilter {
    if let Some(directive) = read_directive(path) {
        match EnvFilter::try_new(&directive) {
            Ok(filter) => return filter,
            Err(e) => eprintln!(
                "Ignoring log filter in {}: {}",
                path.display(),
                e
            ),
        }
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// First non-comment line of the filter file
fn read_directive(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}
