use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::matching::{MatchingConfig, MatchingConfigError};

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
    pub matching: MatchingConfig,
    /// Directory holding the CSV exports used to seed the in-memory stores.
    pub snapshot_dir: Option<PathBuf>,
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
        let snapshot_dir = env::var("MATCH_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: load_matching_config()?,
            snapshot_dir,
        })
    }
}

/// Builds the matching configuration from an optional JSON file plus `MATCH_*` overrides.
pub fn load_matching_config() -> Result<MatchingConfig, ConfigError> {
    let mut config = match env::var("MATCH_CONFIG_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            let path = PathBuf::from(path);
            let raw = std::fs::read_to_string(&path).map_err(|source| {
                ConfigError::MatchingFile {
                    path: path.clone(),
                    source,
                }
            })?;
            serde_json::from_str(&raw).map_err(|source| ConfigError::MatchingJson { path, source })?
        }
        _ => MatchingConfig::default(),
    };

    override_from_env("MATCH_WEIGHT_LOCATION", &mut config.weights.location)?;
    override_from_env("MATCH_WEIGHT_LICENSE", &mut config.weights.driving_license)?;
    override_from_env("MATCH_WEIGHT_VEHICLE", &mut config.weights.vehicle)?;
    override_from_env("MATCH_WEIGHT_PCD", &mut config.weights.pcd)?;
    override_from_env(
        "MATCH_WEIGHT_COMPLETENESS",
        &mut config.weights.profile_completeness,
    )?;
    override_from_env(
        "MATCH_COMPLETENESS_THRESHOLD",
        &mut config.completeness_threshold,
    )?;
    override_from_env("MATCH_DEFAULT_LIMIT", &mut config.default_limit)?;
    override_from_env("MATCH_MAX_LIMIT", &mut config.max_limit)?;
    override_from_env("MATCH_DEADLINE_MS", &mut config.deadline_ms)?;

    let mut workers = 0usize;
    if override_from_env("MATCH_WORKERS", &mut workers)? {
        config.workers = Some(workers);
    }

    config.validate()?;
    Ok(config)
}

fn override_from_env<T: FromStr>(var: &'static str, target: &mut T) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(false);
    };
    if raw.trim().is_empty() {
        return Ok(false);
    }

    *target = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw })?;
    Ok(true)
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidNumber {
        var: &'static str,
        value: String,
    },
    MatchingFile {
        path: PathBuf,
        source: std::io::Error,
    },
    MatchingJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    Matching(MatchingConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{} must be a non-negative integer, found '{}'", var, value)
            }
            ConfigError::MatchingFile { path, .. } => {
                write!(f, "unable to read matching config {}", path.display())
            }
            ConfigError::MatchingJson { path, .. } => {
                write!(f, "matching config {} is not valid JSON", path.display())
            }
            ConfigError::Matching(err) => write!(f, "invalid matching config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::MatchingFile { source, .. } => Some(source),
            ConfigError::MatchingJson { source, .. } => Some(source),
            ConfigError::Matching(err) => Some(err),
        }
    }
}

impl From<MatchingConfigError> for ConfigError {
    fn from(value: MatchingConfigError) -> Self {
        Self::Matching(value)
    }
}
