use crate::evaluations::period::{PeriodError, PeriodToken};
use crate::evaluations::projection::DEFAULT_LABEL_WIDTH;
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
    pub dashboard: DashboardConfig,
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
            dashboard: DashboardConfig::from_env()?,
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

/// Defaults applied to dashboard requests that leave them unset.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub label_width: usize,
    pub default_period: PeriodToken,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            label_width: DEFAULT_LABEL_WIDTH,
            default_period: PeriodToken::AllTime,
        }
    }
}

impl DashboardConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let label_width = match env::var("DASHBOARD_LABEL_WIDTH") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(width) if width > 0 => width,
                _ => return Err(ConfigError::InvalidLabelWidth),
            },
            Err(_) => DEFAULT_LABEL_WIDTH,
        };

        let default_period = match env::var("DASHBOARD_DEFAULT_PERIOD") {
            Ok(raw) => raw
                .parse::<PeriodToken>()
                .map_err(|source| ConfigError::InvalidPeriod { source })?,
            Err(_) => PeriodToken::AllTime,
        };

        Ok(Self {
            label_width,
            default_period,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLabelWidth,
    InvalidPeriod { source: PeriodError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLabelWidth => {
                write!(f, "DASHBOARD_LABEL_WIDTH must be a positive integer")
            }
            ConfigError::InvalidPeriod { source } => {
                write!(f, "DASHBOARD_DEFAULT_PERIOD is not a known period: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidLabelWidth => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPeriod { source } => Some(source),
        }
    }
}
