//! Shared fixtures for the migration integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use migration::{MigrationId, Registry, Runner, RunnerConfig, UnitKind, VersionStore};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, QueryResult,
    Statement,
};
use sea_orm_migration::prelude::*;

/// Fresh in-memory SQLite database.
///
/// A single pooled connection keeps the in-memory database alive and shared.
pub async fn connect() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(opts).await.expect("connect to in-memory sqlite")
}

/// Separate pool over a SQLite file, standing in for another process.
pub async fn connect_file(path: &std::path::Path) -> DatabaseConnection {
    let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opts.max_connections(1).sqlx_logging(false);
    Database::connect(opts).await.expect("connect to sqlite file")
}

pub fn runner(db: &DatabaseConnection, kind: UnitKind, units: Vec<Box<dyn MigrationTrait>>) -> Runner {
    let config = match kind {
        UnitKind::Schema => RunnerConfig::default(),
        UnitKind::Seed => RunnerConfig::seeds(&::common::TrackingConfig::default()),
    };
    Runner::new(db.clone(), config, Registry::new(kind, units).expect("valid registry"))
}

pub fn id(name: &str) -> MigrationId {
    name.parse().expect("valid identity")
}

pub fn names(ids: &[MigrationId]) -> Vec<&str> {
    ids.iter().map(MigrationId::as_str).collect()
}

async fn query(db: &DatabaseConnection, sql: &str) -> Vec<QueryResult> {
    db.query_all(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
        .await
        .expect("introspection query")
}

/// User tables, excluding SQLite internals and the tracking tables.
pub async fn tables(db: &DatabaseConnection) -> Vec<String> {
    query(
        db,
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' \
         AND name NOT IN ('schema_versions', 'seed_versions') ORDER BY name",
    )
    .await
    .iter()
    .map(|row| row.try_get::<String>("", "name").expect("table name"))
    .collect()
}

pub async fn columns(db: &DatabaseConnection, table: &str) -> Vec<String> {
    query(
        db,
        &format!("SELECT name FROM pragma_table_info('{table}') ORDER BY cid"),
    )
    .await
    .iter()
    .map(|row| row.try_get::<String>("", "name").expect("column name"))
    .collect()
}

/// Structural description of the schema: columns, foreign keys and indexes
/// of every user table.
pub async fn snapshot(db: &DatabaseConnection) -> Vec<String> {
    let mut lines = Vec::new();

    for table in tables(db).await {
        lines.push(format!("table {table}"));

        for row in query(
            db,
            &format!(
                "SELECT name, type, \"notnull\" AS not_null, dflt_value, pk \
                 FROM pragma_table_info('{table}') ORDER BY cid"
            ),
        )
        .await
        {
            lines.push(format!(
                "  column {} {} notnull={} default={:?} pk={}",
                row.try_get::<String>("", "name").unwrap_or_default(),
                row.try_get::<String>("", "type").unwrap_or_default(),
                row.try_get::<i32>("", "not_null").unwrap_or_default(),
                row.try_get::<Option<String>>("", "dflt_value").unwrap_or_default(),
                row.try_get::<i32>("", "pk").unwrap_or_default(),
            ));
        }

        for row in query(
            db,
            &format!(
                "SELECT \"from\" AS from_col, \"table\" AS to_table, on_delete \
                 FROM pragma_foreign_key_list('{table}') ORDER BY \"from\""
            ),
        )
        .await
        {
            lines.push(format!(
                "  fk {} -> {} on delete {}",
                row.try_get::<String>("", "from_col").unwrap_or_default(),
                row.try_get::<String>("", "to_table").unwrap_or_default(),
                row.try_get::<String>("", "on_delete").unwrap_or_default(),
            ));
        }

        for row in query(
            db,
            &format!("SELECT name, \"unique\" AS is_unique FROM pragma_index_list('{table}') ORDER BY name"),
        )
        .await
        {
            lines.push(format!(
                "  index {} unique={}",
                row.try_get::<String>("", "name").unwrap_or_default(),
                row.try_get::<i32>("", "is_unique").unwrap_or_default(),
            ));
        }
    }

    lines
}

/// `ON DELETE` action of the foreign key on `table.column`, if any.
pub async fn on_delete(db: &DatabaseConnection, table: &str, column: &str) -> Option<String> {
    query(
        db,
        &format!("SELECT on_delete FROM pragma_foreign_key_list('{table}') WHERE \"from\" = '{column}'"),
    )
    .await
    .first()
    .map(|row| row.try_get::<String>("", "on_delete").expect("on_delete"))
}

pub async fn count(db: &DatabaseConnection, sql: &str) -> i64 {
    query(db, sql)
        .await
        .first()
        .map(|row| row.try_get_by_index::<i64>(0).expect("count"))
        .unwrap_or_default()
}

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Test unit that records its calls and optionally owns a table.
pub struct Recording {
    name: &'static str,
    log: Log,
    fail_up: bool,
}

impl Recording {
    pub fn boxed(name: &'static str, log: &Log) -> Box<dyn MigrationTrait> {
        Box::new(Self {
            name,
            log: log.clone(),
            fail_up: false,
        })
    }

    /// Creates its table, then fails.
    pub fn failing(name: &'static str, log: &Log) -> Box<dyn MigrationTrait> {
        Box::new(Self {
            name,
            log: log.clone(),
            fail_up: true,
        })
    }

    fn table(&self) -> Alias {
        Alias::new(format!("t_{}", &self.name[17..]))
    }
}

impl MigrationName for Recording {
    fn name(&self) -> &str {
        self.name
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Recording {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.log.lock().unwrap().push(format!("up:{}", self.name));
        manager
            .create_table(
                Table::create()
                    .table(self.table())
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().primary_key())
                    .to_owned(),
            )
            .await?;
        if self.fail_up {
            return Err(DbErr::Custom(format!("{} refused", self.name)));
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.log.lock().unwrap().push(format!("down:{}", self.name));
        manager
            .drop_table(Table::drop().table(self.table()).to_owned())
            .await
    }
}

/// Test unit that, while running, touches another unit's tracking record
/// the way a second runner racing on the same database would.
pub struct Interloper {
    name: &'static str,
    claims: Option<&'static str>,
    releases: Option<&'static str>,
}

impl Interloper {
    /// Records `claims` as applied during its own `up`.
    pub fn boxed(name: &'static str, claims: &'static str) -> Box<dyn MigrationTrait> {
        Box::new(Self {
            name,
            claims: Some(claims),
            releases: None,
        })
    }

    /// Removes the record of `releases` during its own `down`.
    pub fn releasing(name: &'static str, releases: &'static str) -> Box<dyn MigrationTrait> {
        Box::new(Self {
            name,
            claims: None,
            releases: Some(releases),
        })
    }

    fn store() -> VersionStore {
        VersionStore::new(::common::constants::DEFAULT_MIGRATIONS_TABLE)
    }
}

impl MigrationName for Interloper {
    fn name(&self) -> &str {
        self.name
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Interloper {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        match self.claims {
            Some(claims) => Self::store()
                .record_applied(manager.get_connection(), &id(claims))
                .await
                .map_err(|e| DbErr::Custom(e.to_string())),
            None => Ok(()),
        }
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        match self.releases {
            Some(releases) => Self::store()
                .record_reverted(manager.get_connection(), &id(releases))
                .await
                .map_err(|e| DbErr::Custom(e.to_string())),
            None => Ok(()),
        }
    }
}
