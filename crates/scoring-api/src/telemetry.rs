//! Logging setup for the binary

use crate::error::ServerError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber
///
/// Logs go to `log_file` (appended, no ANSI colours) when given, otherwise
/// to stderr. `RUST_LOG` overrides the level.
pub fn init(log_file: Option<&Path>) -> Result<(), ServerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    ServerError::Telemetry(format!("cannot open {}: {}", path.display(), e))
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| ServerError::Telemetry(e.to_string()))
}
