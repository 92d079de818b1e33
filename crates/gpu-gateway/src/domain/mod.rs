//! Domain types for the GPU gateway.
//!
//! Configuration, error handling, response bodies and request validation.

pub mod config;
pub mod error;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use config::{ConfigError, CorsConfig, HttpConfig, LimitsConfig, LoggingConfig, ServiceConfig};
pub use error::{ApiError, ApiResult, GatewayError};
pub use types::*;
