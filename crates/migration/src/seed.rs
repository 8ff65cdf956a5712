//! Seed units: fixed reference rows keyed by natural key.
//!
//! A seed inserts its rows with `ON CONFLICT DO NOTHING` on the key column
//! and, when reverted, deletes exactly the keys it declares. Rows added by
//! users survive a revert.

use std::collections::HashSet;

use sea_orm::sea_query::{
    DeleteStatement, DynIden, Expr, InsertStatement, IntoIden, OnConflict, Query, SimpleExpr,
    Value,
};
use sea_orm::DbErr;
use sea_orm_migration::{MigrationName, MigrationTrait, SchemaManager};

use crate::error::{MigrationError, MigrationResult};

/// One seeded row: its natural key plus values for the extra columns.
#[derive(Debug, Clone)]
pub struct SeedRow {
    key: String,
    values: Vec<Value>,
}

/// The rows a seed unit owns.
#[derive(Debug, Clone)]
pub struct SeedRecordSet {
    table: DynIden,
    key_column: DynIden,
    columns: Vec<DynIden>,
    rows: Vec<SeedRow>,
}

impl SeedRecordSet {
    /// Rows for `table`, identified by the unique `key_column`.
    pub fn new(table: impl IntoIden, key_column: impl IntoIden) -> Self {
        Self {
            table: table.into_iden(),
            key_column: key_column.into_iden(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Declare an extra column; every row must then supply a value for it.
    pub fn column(mut self, column: impl IntoIden) -> Self {
        self.columns.push(column.into_iden());
        self
    }

    /// Add a row with values for the extra columns, in declaration order.
    pub fn row(mut self, key: impl Into<String>, values: Vec<Value>) -> Self {
        self.rows.push(SeedRow {
            key: key.into(),
            values,
        });
        self
    }

    /// Add a row that only carries its key.
    pub fn key(self, key: impl Into<String>) -> Self {
        self.row(key, Vec::new())
    }

    /// Natural keys, in declaration order
    pub fn keys(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check the set is non-empty, keys are unique and rows are complete.
    pub fn validate(&self) -> MigrationResult<()> {
        if self.rows.is_empty() {
            return Err(MigrationError::Seed("no rows declared".to_string()));
        }

        let mut seen = HashSet::new();
        for row in &self.rows {
            if !seen.insert(row.key.as_str()) {
                return Err(MigrationError::Seed(format!(
                    "key '{}' declared twice",
                    row.key
                )));
            }
            if row.values.len() != self.columns.len() {
                return Err(MigrationError::Seed(format!(
                    "row '{}' has {} values for {} columns",
                    row.key,
                    row.values.len(),
                    self.columns.len()
                )));
            }
        }
        Ok(())
    }

    /// Insert every row, leaving rows whose key already exists untouched.
    pub fn insert_statement(&self) -> MigrationResult<InsertStatement> {
        self.validate()?;

        let mut insert = Query::insert();
        insert
            .into_table(self.table.clone())
            .columns(
                std::iter::once(self.key_column.clone()).chain(self.columns.iter().cloned()),
            )
            .on_conflict(
                OnConflict::column(self.key_column.clone())
                    .do_nothing()
                    .to_owned(),
            );

        for row in &self.rows {
            let values = std::iter::once(SimpleExpr::from(row.key.as_str()))
                .chain(row.values.iter().cloned().map(SimpleExpr::from));
            insert
                .values(values)
                .map_err(|e| MigrationError::Seed(e.to_string()))?;
        }

        Ok(insert.to_owned())
    }

    /// Delete exactly the declared keys.
    pub fn delete_statement(&self) -> MigrationResult<DeleteStatement> {
        self.validate()?;

        Ok(Query::delete()
            .from_table(self.table.clone())
            .and_where(Expr::col(self.key_column.clone()).is_in(self.keys()))
            .to_owned())
    }
}

/// A unit whose whole effect is a [`SeedRecordSet`].
pub trait SeedUnit: MigrationName + Send + Sync {
    fn records(&self) -> SeedRecordSet;
}

/// Adapts a [`SeedUnit`] to the migration contract the runner executes.
pub struct Seed<S>(pub S);

impl<S: SeedUnit> MigrationName for Seed<S> {
    fn name(&self) -> &str {
        self.0.name()
    }
}

#[async_trait::async_trait]
impl<S: SeedUnit + 'static> MigrationTrait for Seed<S> {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let insert = self.0.records().insert_statement().map_err(into_db_err)?;
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = self.0.records().delete_statement().map_err(into_db_err)?;
        manager.exec_stmt(delete).await
    }
}

fn into_db_err(err: MigrationError) -> DbErr {
    DbErr::Custom(err.to_string())
}
