//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Data store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("Resources/hawaii.sqlite")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Reject `<start>`/`<end>` path segments that are not `YYYY-MM-DD`
    #[serde(default = "default_validate_dates")]
    pub validate_dates: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_validate_dates() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            validate_dates: default_validate_dates(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, else the default locations, else environment only.
    ///
    /// An explicit path that cannot be loaded is an error; a broken file in a
    /// default location is skipped and recorded in the returned [`ConfigLoad`].
    pub fn load_default(explicit: Option<&Path>) -> Result<ConfigLoad, ConfigError> {
        if let Some(path) = explicit {
            return Ok(ConfigLoad {
                config: Self::load_with_env(path)?,
                source: Some(path.to_path_buf()),
                skipped: Vec::new(),
            });
        }

        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("climate").join("config.toml")),
            Some(PathBuf::from("/etc/climate/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(Self::load_first(&config_paths))
    }

    /// Load the first candidate that exists and parses
    fn load_first(candidates: &[PathBuf]) -> ConfigLoad {
        let mut skipped = Vec::new();

        for path in candidates {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        return ConfigLoad {
                            config,
                            source: Some(path.clone()),
                            skipped,
                        };
                    }
                    Err(e) => skipped.push(e),
                }
            }
        }

        ConfigLoad {
            config: Self::from_env(),
            source: None,
            skipped,
        }
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Store overrides
        if let Some(path) = lookup("CLIMATE_DB_PATH") {
            self.store.path = PathBuf::from(path);
        }

        // API overrides
        if let Some(host) = lookup("CLIMATE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("CLIMATE_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid CLIMATE_API_PORT: {}", port),
            }
        }
        if let Some(flag) = lookup("CLIMATE_VALIDATE_DATES") {
            self.api.validate_dates = flag.to_lowercase() != "false" && flag != "0";
        }

        // Logging overrides
        if let Some(level) = lookup("CLIMATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CLIMATE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of [`Config::load_default`]
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    /// Default-location files that exist but failed to load
    pub skipped: Vec<ConfigError>,
}

impl ConfigLoad {
    /// Report where the config came from; call once tracing is initialized
    pub fn log(&self) {
        for error in &self.skipped {
            tracing::warn!("Skipped config file: {}", error);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Climate API Configuration
#
# Environment variables override these settings:
# - CLIMATE_DB_PATH
# - CLIMATE_API_HOST
# - CLIMATE_API_PORT
# - CLIMATE_VALIDATE_DATES
# - CLIMATE_LOG_LEVEL
# - CLIMATE_LOG_FORMAT

[store]
# SQLite file holding the measurement and station tables
path = "Resources/hawaii.sqlite"

[api]
# API server host
host = "127.0.0.1"

# API server port
port = 5000

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Answer 400 for start/end dates that are not YYYY-MM-DD.
# When false, dates are compared as text and non-ISO strings give silently
# wrong windows.
validate_dates = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
