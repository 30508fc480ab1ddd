use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::insurance::quote::{DEFAULT_MAX_PREMIUM, DEFAULT_MIN_PREMIUM};

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

/// Top-level configuration for the intake service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub quote: QuoteConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let min_premium = premium_var("APP_QUOTE_MIN", DEFAULT_MIN_PREMIUM)?;
        let max_premium = premium_var("APP_QUOTE_MAX", DEFAULT_MAX_PREMIUM)?;
        if min_premium >= max_premium {
            return Err(ConfigError::InvalidQuoteRange {
                min: min_premium,
                max: max_premium,
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            quote: QuoteConfig {
                min_premium,
                max_premium,
            },
        })
    }
}

const DEFAULT_PORT: u16 = 5150;

fn premium_var(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPremium { name }),
        Err(_) => Ok(default),
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

/// Range of the placeholder six-month premium, `[min_premium, max_premium)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteConfig {
    pub min_premium: u32,
    pub max_premium: u32,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            min_premium: DEFAULT_MIN_PREMIUM,
            max_premium: DEFAULT_MAX_PREMIUM,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPremium { name: &'static str },
    InvalidQuoteRange { min: u32, max: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPremium { name } => {
                write!(f, "{name} must be a whole number of dollars")
            }
            ConfigError::InvalidQuoteRange { min, max } => write!(
                f,
                "APP_QUOTE_MIN ({min}) must be lower than APP_QUOTE_MAX ({max})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPremium { .. }
            | ConfigError::InvalidQuoteRange { .. } => None,
        }
    }
}
