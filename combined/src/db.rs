//! Database connection setup.

use std::time::Duration;

use common::AppResult;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use crate::config::Config;

/// Open a pool for the resolved configuration.
pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(common::constants::CONNECT_TIMEOUT_SECS))
        .sqlx_logging(config.database.sql_logging);

    let db = Database::connect(opts).await?;
    tracing::info!(
        environment = %config.environment,
        backend = ?db.get_database_backend(),
        "Connected to database"
    );
    Ok(db)
}
