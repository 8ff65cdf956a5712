//! Schema version store.
//!
//! One tracking table per unit kind, living in the target database:
//! `(identity varchar primary key, applied_at timestamptz)`. Every method is
//! generic over the connection so record writes can share the transaction
//! of the unit they describe.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, ColumnDef, Expr, Order, Query, Table};
use sea_orm::{ConnectionTrait, DbErr, DeriveIden, FromQueryResult, SqlErr};
use serde::Serialize;

use crate::error::{MigrationError, MigrationResult};
use crate::identity::MigrationId;

/// Longest identity the tracking table accepts
const IDENTITY_LENGTH: u32 = 255;

#[derive(DeriveIden)]
enum Tracking {
    Identity,
    AppliedAt,
}

#[derive(Debug, FromQueryResult)]
struct StoredRecord {
    identity: String,
    applied_at: DateTime<Utc>,
}

/// One applied unit, as recorded in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedRecord {
    pub identity: MigrationId,
    pub applied_at: DateTime<Utc>,
}

impl From<StoredRecord> for AppliedRecord {
    fn from(record: StoredRecord) -> Self {
        Self {
            identity: MigrationId::from_stored(record.identity),
            applied_at: record.applied_at,
        }
    }
}

/// Access to one tracking table.
#[derive(Debug, Clone)]
pub struct VersionStore {
    table: String,
}

impl VersionStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn table_iden(&self) -> Alias {
        Alias::new(self.table.as_str())
    }

    /// Create the tracking table if it does not exist yet.
    pub async fn ensure_exists<C: ConnectionTrait>(&self, conn: &C) -> MigrationResult<()> {
        let stmt = Table::create()
            .table(self.table_iden())
            .if_not_exists()
            .col(
                ColumnDef::new(Tracking::Identity)
                    .string_len(IDENTITY_LENGTH)
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Tracking::AppliedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();

        let backend = conn.get_database_backend();
        conn.execute(backend.build(&stmt))
            .await
            .map_err(MigrationError::Store)?;

        tracing::debug!(table = %self.table, "Version store ready");
        Ok(())
    }

    /// Applied records in ascending identity order.
    pub async fn list_applied<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> MigrationResult<Vec<AppliedRecord>> {
        let query = Query::select()
            .columns([Tracking::Identity, Tracking::AppliedAt])
            .from(self.table_iden())
            .order_by(Tracking::Identity, Order::Asc)
            .to_owned();

        let backend = conn.get_database_backend();
        let records = StoredRecord::find_by_statement(backend.build(&query))
            .all(conn)
            .await
            .map_err(MigrationError::Store)?;

        Ok(records.into_iter().map(AppliedRecord::from).collect())
    }

    pub async fn is_applied<C: ConnectionTrait>(
        &self,
        conn: &C,
        identity: &MigrationId,
    ) -> MigrationResult<bool> {
        let query = Query::select()
            .column(Tracking::Identity)
            .from(self.table_iden())
            .and_where(Expr::col(Tracking::Identity).eq(identity.as_str()))
            .to_owned();

        let backend = conn.get_database_backend();
        let row = conn
            .query_one(backend.build(&query))
            .await
            .map_err(MigrationError::Store)?;

        Ok(row.is_some())
    }

    /// Insert the record for `identity`.
    ///
    /// The primary key rejects a second insert; that collision comes back as
    /// [`MigrationError::DuplicateApplication`].
    pub async fn record_applied<C: ConnectionTrait>(
        &self,
        conn: &C,
        identity: &MigrationId,
    ) -> MigrationResult<()> {
        let insert = Query::insert()
            .into_table(self.table_iden())
            .columns([Tracking::Identity, Tracking::AppliedAt])
            .values_panic([identity.as_str().into(), Utc::now().into()])
            .to_owned();

        let backend = conn.get_database_backend();
        conn.execute(backend.build(&insert))
            .await
            .map_err(|source| write_error(identity, source))?;

        Ok(())
    }

    /// Remove the record for `identity`.
    pub async fn record_reverted<C: ConnectionTrait>(
        &self,
        conn: &C,
        identity: &MigrationId,
    ) -> MigrationResult<()> {
        let delete = Query::delete()
            .from_table(self.table_iden())
            .and_where(Expr::col(Tracking::Identity).eq(identity.as_str()))
            .to_owned();

        let backend = conn.get_database_backend();
        let result = conn
            .execute(backend.build(&delete))
            .await
            .map_err(|source| write_error(identity, source))?;

        if result.rows_affected() == 0 {
            return Err(MigrationError::NotApplied {
                identity: identity.clone(),
            });
        }
        Ok(())
    }
}

fn write_error(identity: &MigrationId, source: DbErr) -> MigrationError {
    match source.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => MigrationError::DuplicateApplication {
            identity: identity.clone(),
        },
        _ => MigrationError::RecordWrite {
            identity: identity.clone(),
            source,
        },
    }
}
