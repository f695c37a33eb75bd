//! Logging setup. Logs go to stderr so stdout stays machine-readable JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::error::DomainError;

pub const LOG_ENV: &str = "POLYHEDGE_LOG";

/// Filter from `RUST_LOG`, then `POLYHEDGE_LOG`, then `default_level`.
pub fn init_logging(default_level: &str) -> Result<(), DomainError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| DomainError::Config(format!("Failed to init logging: {e}")))
}
