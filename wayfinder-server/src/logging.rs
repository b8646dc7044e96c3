use tracing_subscriber::EnvFilter;

use crate::error::ServerError;

/// Installs the global fmt subscriber writing to stderr.
///
/// `RUST_LOG` wins over `default_filter`. Records emitted through the `log`
/// facade by the planner core are picked up by the subscriber as well.
pub fn init(default_filter: &str) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| ServerError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}
