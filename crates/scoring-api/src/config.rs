//! Configuration file parsing for the scoring service.
//!
//! Loads settings from TOML files including bind address, token secrets,
//! validation limits and store location.

use scoring_domain::DEFAULT_ADMIN_LOGIN;
use scoring_gatekeeper::ValidationConfig;
use scoring_store::StoreOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Service configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// Log file; stderr when absent
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Token secrets and admin settings
    pub auth: AuthConfig,

    /// Field rule limits
    #[serde(default)]
    pub validation: ValidationSection,

    /// Backing store
    #[serde(default)]
    pub store: StoreConfig,
}

/// Token secrets and admin settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret mixed into regular users' tokens
    pub salt: String,

    /// Secret mixed into the hourly admin token
    pub admin_salt: String,

    /// Login treated as administrator
    #[serde(default = "default_admin_login")]
    pub admin_login: String,

    /// Score answered to administrators
    #[serde(default = "default_admin_score")]
    pub admin_score: f64,
}

/// Field rule limits
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationSection {
    /// Earliest accepted birth year
    #[serde(default = "default_min_birth_year")]
    pub min_birth_year: i32,

    /// Minimum age in years
    #[serde(default = "default_min_age")]
    pub min_age: u32,
}

/// Backing store settings
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path (":memory:" for a throwaway store)
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// SQLite busy timeout in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Lifetime of cached scores in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_admin_login() -> String {
    DEFAULT_ADMIN_LOGIN.to_string()
}

fn default_admin_score() -> f64 {
    42.0
}

fn default_min_birth_year() -> i32 {
    ValidationConfig::default().min_birth_year
}

fn default_min_age() -> u32 {
    ValidationConfig::default().min_age
}

fn default_store_path() -> PathBuf {
    PathBuf::from("scoring.db")
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Default cache TTL: 1 hour
fn default_cache_ttl() -> u64 {
    3600
}

impl Default for ValidationSection {
    fn default() -> Self {
        Self {
            min_birth_year: default_min_birth_year(),
            min_age: default_min_age(),
        }
    }
}

impl ValidationSection {
    /// Limits for the gatekeeper
    pub fn to_validation_config(&self) -> ValidationConfig {
        ValidationConfig {
            min_birth_year: self.min_birth_year,
            min_age: self.min_age,
            ..ValidationConfig::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl StoreConfig {
    /// Options for the SQLite store
    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            cache_ttl_secs: self.cache_ttl_secs,
        }
    }
}

impl ScoringConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig = toml::from_str(contents)?;

        // Validate required fields
        if config.auth.salt.is_empty() {
            return Err(ConfigError::MissingField("auth.salt".to_string()));
        }
        if config.auth.admin_salt.is_empty() {
            return Err(ConfigError::MissingField("auth.admin_salt".to_string()));
        }
        if config.auth.admin_login.is_empty() {
            return Err(ConfigError::MissingField("auth.admin_login".to_string()));
        }

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ScoringConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            log_file: None,
            auth: AuthConfig {
                salt: "Otus".to_string(),
                admin_salt: "42".to_string(),
                admin_login: default_admin_login(),
                admin_score: default_admin_score(),
            },
            validation: ValidationSection::default(),
            store: StoreConfig {
                path: PathBuf::from(":memory:"),
                ..StoreConfig::default()
            },
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
