//! Log subscriber setup.

use crate::domain::config::LoggingConfig;
use crate::domain::error::GatewayError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber: `EnvFilter` from `config.level`, human
/// readable or JSON lines depending on `config.json`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), GatewayError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| GatewayError::Config(format!("invalid log filter {:?}: {e}", config.level)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };

    result.map_err(|e| GatewayError::Config(format!("logging already initialized: {e}")))
}
