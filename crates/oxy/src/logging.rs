//! Log file setup for terminal applications.
//!
//! A full-screen terminal app cannot log to stdout or stderr without
//! corrupting its own display, so logs go to a file instead:
//!
//! ```rust,ignore
//! oxy::logging::log_to_file("oxy.log")?;
//! ```
//!
//! Verbosity follows `RUST_LOG` (e.g. `RUST_LOG=oxy_widgets=debug`),
//! defaulting to `info`.

use crate::driver::DriverError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

/// Install a global subscriber that appends formatted events to `path`.
///
/// Fails if the file cannot be opened or a global subscriber is already set.
pub fn log_to_file(path: impl AsRef<Path>) -> Result<(), DriverError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| DriverError::Logging(err.to_string()))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
