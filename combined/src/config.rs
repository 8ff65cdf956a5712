//! Runtime configuration resolved from the environment.

use std::env;
use std::path::{Path, PathBuf};

use common::{AppError, AppResult, DatabaseConfig, Environment, EnvironmentConfigs, TrackingConfig};

/// Resolved configuration for one command invocation
#[derive(Clone)]
pub struct Config {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub database_url: String,
    pub tracking: TrackingConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("database", &self.database)
            .field("database_url", &"[REDACTED]")
            .field("tracking", &self.tracking)
            .finish()
    }
}

impl Config {
    /// Load `.env`, then resolve against the process environment.
    pub fn load(environment: Environment, config_path: Option<&Path>) -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::resolve(environment, config_path, |name| env::var(name).ok())
    }

    /// Resolve configuration with an explicit variable lookup.
    ///
    /// Precedence: the config file entry for `environment`, then
    /// `DATABASE_URL`, then the development default. Production never falls
    /// back to the default.
    pub fn resolve<F>(environment: Environment, config_path: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut database = match (config_path, lookup("DATABASE_URL")) {
            (Some(path), _) => EnvironmentConfigs::from_file(path)?.resolve(environment)?,
            (None, Some(url)) => DatabaseConfig::with_url(url),
            (None, None) if environment.is_production() => {
                return Err(AppError::config(
                    "production requires DATABASE_URL or a database config file",
                ))
            }
            (None, None) => {
                tracing::warn!(%environment, "DATABASE_URL not set, using default database");
                DatabaseConfig::default()
            }
        };

        if let Some(value) = lookup("DATABASE_MAX_CONNECTIONS") {
            database.max_connections = value.parse().map_err(|_| {
                AppError::config(format!("DATABASE_MAX_CONNECTIONS is not a number: {}", value))
            })?;
            database.min_connections = database.min_connections.min(database.max_connections);
        }

        let database_url = database.connection_url(&lookup)?;

        Ok(Self {
            environment,
            database,
            database_url,
            tracking: TrackingConfig::default(),
        })
    }
}

/// Where generated unit files go, relative to the workspace root.
pub fn default_unit_dir(seed: bool) -> PathBuf {
    if seed {
        PathBuf::from(common::constants::DEFAULT_SEEDS_DIR)
    } else {
        PathBuf::from(common::constants::DEFAULT_MIGRATIONS_DIR)
    }
}
