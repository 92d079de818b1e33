//! Service configuration loaded from the environment with validation.

use gpu_compute::config::{
    DEFAULT_MAX_COMPUTATION_TIME, DEFAULT_MAX_CONCURRENT_MATRIX, DEFAULT_MAX_MATRIX_SIZE,
    DEFAULT_SIMULATE_DELAY,
};
use gpu_compute::EngineConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Environment name that enables wildcard CORS and error details
pub const DEVELOPMENT: &str = "development";

/// Origin allowed outside development when none is configured
pub const DEFAULT_PRODUCTION_ORIGIN: &str = "https://your-backend-domain.com";

/// Main service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Deployment environment name (`development`, `production`, ...)
    pub environment: String,
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Bearer token for protected routes (None = protected routes answer 500)
    pub service_token: Option<String>,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Request validation limits
    pub limits: LimitsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Core engine configuration
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: "production".to_string(),
            http: HttpConfig::default(),
            service_token: None,
            cors: CorsConfig::default(),
            limits: LimitsConfig::default(),
            logging: LoggingConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ENVIRONMENT`: Deployment environment (default: production)
    /// - `HOST` / `PORT`: Bind address (default: 0.0.0.0:8000)
    /// - `GPU_SERVICE_TOKEN`: Bearer token for protected routes
    /// - `MAX_COMPUTATION_TIME`: Advisory max seconds (default: 30)
    /// - `SIMULATE_GPU_DELAY`: Base delay in seconds, fractional allowed (default: 2)
    /// - `MAX_MATRIX_SIZE`: Largest accepted matrix_size (default: 2048)
    /// - `MAX_CONCURRENT_MATRIX`: Matrix products run at once (default: 4)
    /// - `CORS_ALLOWED_ORIGINS`: Comma separated origins outside development
    /// - `RUST_LOG` or `LOG_LEVEL`: Log filter (default: info)
    /// - `JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);
        let is_development = environment == DEVELOPMENT;

        let allowed_origins = if is_development {
            vec!["*".to_string()]
        } else {
            lookup("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_else(|| vec![DEFAULT_PRODUCTION_ORIGIN.to_string()])
        };

        let max_computation_secs: u64 = parse_var(
            &lookup,
            "MAX_COMPUTATION_TIME",
            DEFAULT_MAX_COMPUTATION_TIME.as_secs(),
        )?;
        let simulate_delay = parse_delay(
            &lookup,
            "SIMULATE_GPU_DELAY",
            DEFAULT_SIMULATE_DELAY.as_secs_f64(),
        )?;

        Ok(Self {
            http: HttpConfig {
                host: lookup("HOST").unwrap_or(defaults.http.host),
                port: parse_var(&lookup, "PORT", defaults.http.port)?,
            },
            service_token: lookup("GPU_SERVICE_TOKEN").filter(|token| !token.is_empty()),
            cors: CorsConfig {
                allowed_origins,
                ..CorsConfig::default()
            },
            limits: defaults.limits,
            logging: LoggingConfig {
                level: lookup("RUST_LOG")
                    .or_else(|| lookup("LOG_LEVEL"))
                    .unwrap_or(defaults.logging.level),
                json: lookup("JSON_LOGS")
                    .map(|v| v.to_lowercase() == "true" || v == "1")
                    .unwrap_or(false),
            },
            engine: EngineConfig {
                gpu_available: true,
                max_computation_time: Duration::from_secs(max_computation_secs),
                simulate_delay,
                max_matrix_size: parse_var(&lookup, "MAX_MATRIX_SIZE", DEFAULT_MAX_MATRIX_SIZE)?,
                max_concurrent_matrix: parse_var(
                    &lookup,
                    "MAX_CONCURRENT_MATRIX",
                    DEFAULT_MAX_CONCURRENT_MATRIX,
                )?,
            },
            environment,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host cannot be empty".into()));
        }

        if self.limits.max_data_chars == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_data_chars cannot be 0".into(),
            ));
        }

        if self.limits.max_batch_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_batch_size cannot be 0".into(),
            ));
        }

        if self.limits.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_body_bytes cannot be 0".into(),
            ));
        }

        if self.engine.max_matrix_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_matrix_size cannot be 0".into(),
            ));
        }

        if self.engine.max_concurrent_matrix == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_concurrent_matrix cannot be 0".into(),
            ));
        }

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == DEVELOPMENT
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind host (IP or resolvable name)
    pub host: String,
    /// Port (default: 8000)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins ("*" mirrors the request origin)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allow credentials
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_PRODUCTION_ORIGIN.to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string()],
            allow_credentials: true,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Max characters in a single `/compute` request's data
    pub max_data_chars: usize,
    /// Max requests in one batch
    pub max_batch_size: usize,
    /// Max request body size in bytes (default: 1MB)
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_data_chars: 10_000,
            max_batch_size: 10,
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Variable present but unparseable
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

/// Seconds as a float; must be finite and non-negative.
fn parse_delay<F>(lookup: &F, key: &str, default_secs: f64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: f64 = parse_var(lookup, key, default_secs)?;
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: secs.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.port, 8000);
        assert_eq!(config.limits.max_data_chars, 10_000);
        assert_eq!(config.limits.max_batch_size, 10);
        assert!(!config.is_development());
    }

    #[test]
    fn test_from_empty_environment() {
        let config = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.http_addr(), "0.0.0.0:8000");
        assert!(config.service_token.is_none());
        assert_eq!(config.engine.simulate_delay, Duration::from_secs(2));
        assert_eq!(config.engine.max_computation_time, Duration::from_secs(30));
        assert_eq!(
            config.cors.allowed_origins,
            vec![DEFAULT_PRODUCTION_ORIGIN.to_string()]
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_environment_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "development"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9001"),
            ("GPU_SERVICE_TOKEN", "s3cret"),
            ("MAX_COMPUTATION_TIME", "60"),
            ("SIMULATE_GPU_DELAY", "0.25"),
            ("RUST_LOG", "debug"),
            ("JSON_LOGS", "true"),
        ]))
        .unwrap();

        assert!(config.is_development());
        assert_eq!(config.http_addr(), "127.0.0.1:9001");
        assert_eq!(config.service_token.as_deref(), Some("s3cret"));
        assert_eq!(config.engine.max_computation_time, Duration::from_secs(60));
        assert_eq!(config.engine.simulate_delay, Duration::from_millis(250));
        assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_production_origins_from_list() {
        let config = ServiceConfig::from_lookup(lookup_from(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://a.example, https://b.example,",
        )]))
        .unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_empty_token_is_unset() {
        let config =
            ServiceConfig::from_lookup(lookup_from(&[("GPU_SERVICE_TOKEN", "")])).unwrap();
        assert!(config.service_token.is_none());
    }

    #[test]
    fn test_malformed_values_rejected() {
        let err = ServiceConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));

        let err = ServiceConfig::from_lookup(lookup_from(&[("MAX_COMPUTATION_TIME", "30.5")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let err = ServiceConfig::from_lookup(lookup_from(&[("SIMULATE_GPU_DELAY", "-1")]))
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "SIMULATE_GPU_DELAY")
        );

        assert!(ServiceConfig::from_lookup(lookup_from(&[("SIMULATE_GPU_DELAY", "inf")])).is_err());
    }

    #[test]
    fn test_limit_validation() {
        let mut config = ServiceConfig::default();
        config.limits.max_batch_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLimit(_))
        ));

        let mut config = ServiceConfig::default();
        config.engine.max_matrix_size = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.engine.max_concurrent_matrix = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_matrix_concurrency_from_env() {
        let config =
            ServiceConfig::from_lookup(lookup_from(&[("MAX_CONCURRENT_MATRIX", "2")])).unwrap();
        assert_eq!(config.engine.max_concurrent_matrix, 2);

        let config = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.engine.max_concurrent_matrix, DEFAULT_MAX_CONCURRENT_MATRIX);
    }
}
