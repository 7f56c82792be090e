use crate::workflows::scoring::{WeightConfiguration, WeightError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Default weights and intake limits applied when a request does not override them.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights: WeightConfiguration,
    pub max_upload_size_mb: usize,
}

const WEIGHT_VARS: [(&str, f64); 6] = [
    ("WEIGHT_MARKET_BUSINESS_MODEL", 35.0),
    ("WEIGHT_COMPETITIVE_LANDSCAPE", 15.0),
    ("WEIGHT_EXECUTION_TEAM", 20.0),
    ("WEIGHT_RISK_FACTORS", 10.0),
    ("WEIGHT_NETWORK_PLATFORM_RISKS", 10.0),
    ("WEIGHT_SOCIAL_ENVIRONMENTAL_IMPACT", 10.0),
];

impl ScoringConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut values = [0.0_f64; 6];
        for (slot, (key, default)) in values.iter_mut().zip(WEIGHT_VARS) {
            *slot = match env::var(key) {
                Ok(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidWeight { key })?,
                Err(_) => default,
            };
        }

        let weights = WeightConfiguration::from_array(values)
            .validated()
            .map_err(ConfigError::Weights)?;

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidUploadLimit)?;

        Ok(Self {
            weights,
            max_upload_size_mb,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfiguration::default(),
            max_upload_size_mb: 10,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeight { key: &'static str },
    InvalidUploadLimit,
    Weights(WeightError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeight { key } => write!(f, "{key} must be a number"),
            ConfigError::InvalidUploadLimit => {
                write!(f, "MAX_UPLOAD_SIZE_MB must be a non-negative integer")
            }
            ConfigError::Weights(err) => write!(f, "default weights rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Weights(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidWeight { .. }
            | ConfigError::InvalidUploadLimit => None,
        }
    }
}
