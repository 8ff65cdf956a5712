//! Shared configuration structures.
//!
//! Configuration is resolved once, at the edge of the binary, and then passed
//! down as plain values. Nothing below the command layer looks up the current
//! environment on its own.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIGRATIONS_LOCK_KEY,
    DEFAULT_MIGRATIONS_TABLE, DEFAULT_MIN_CONNECTIONS, DEFAULT_SEEDS_LOCK_KEY,
    DEFAULT_SEEDS_TABLE,
};
use crate::error::{AppError, AppResult};

/// Deployment environment selecting a set of connection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Key used for this environment in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    /// Production requires explicit connection settings
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(AppError::config(format!("Unknown environment '{}'", other))),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Database configuration.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection URL; ignored when `use_env_variable` is set
    #[serde(default)]
    pub url: Option<String>,
    /// Name of an environment variable holding the connection URL
    #[serde(default)]
    pub use_env_variable: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Log every statement the driver executes
    #[serde(default)]
    pub sql_logging: bool,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_min_connections() -> u32 {
    DEFAULT_MIN_CONNECTIONS
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("use_env_variable", &self.use_env_variable)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("sql_logging", &self.sql_logging)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Some(DEFAULT_DATABASE_URL.to_string()),
            use_env_variable: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            sql_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Configuration pointing at a literal URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Resolve the connection URL.
    ///
    /// `lookup` reads environment variables; it is a parameter so callers
    /// decide where values come from.
    pub fn connection_url<F>(&self, lookup: F) -> AppResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(var) = &self.use_env_variable {
            return lookup(var).ok_or_else(|| {
                AppError::config(format!("Environment variable {} is not set", var))
            });
        }

        self.url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::config("Database URL is not configured"))
    }

    fn validate(&self, env: Environment) -> AppResult<()> {
        if self.max_connections == 0 {
            return Err(AppError::config(format!(
                "{}: max_connections must be at least 1",
                env
            )));
        }
        if self.min_connections > self.max_connections {
            return Err(AppError::config(format!(
                "{}: min_connections ({}) exceeds max_connections ({})",
                env, self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }
}

/// Per-environment database settings, as stored in a JSON config file:
///
/// ```json
/// {
///   "development": { "url": "sqlite://hr_admin.db?mode=rwc" },
///   "production": { "use_env_variable": "DATABASE_URL", "max_connections": 10 }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EnvironmentConfigs {
    environments: HashMap<String, DatabaseConfig>,
}

impl EnvironmentConfigs {
    /// Parse a JSON document keyed by environment name.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| AppError::config(format!("Invalid database config: {}", e)))
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Loaded database config file");
        Self::from_json_str(&content)
    }

    /// Select and validate the settings for one environment.
    pub fn resolve(&self, env: Environment) -> AppResult<DatabaseConfig> {
        let config = self.environments.get(env.as_str()).cloned().ok_or_else(|| {
            AppError::config(format!("No database configuration for environment '{}'", env))
        })?;
        config.validate(env)?;
        Ok(config)
    }

    /// Environment names present in the file
    pub fn environments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.environments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Names and lock keys of the version tracking tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackingConfig {
    pub migrations_table: String,
    pub seeds_table: String,
    pub migrations_lock_key: i64,
    pub seeds_lock_key: i64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            migrations_table: DEFAULT_MIGRATIONS_TABLE.to_string(),
            seeds_table: DEFAULT_SEEDS_TABLE.to_string(),
            migrations_lock_key: DEFAULT_MIGRATIONS_LOCK_KEY,
            seeds_lock_key: DEFAULT_SEEDS_LOCK_KEY,
        }
    }
}
