//! Cross-process serialization of unit execution.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

/// Take the run lock for the lifetime of the current transaction.
///
/// PostgreSQL gets a transaction-scoped advisory lock, released on commit or
/// rollback. SQLite transactions start deferred, so a reader that upgrades to
/// a writer after another connection committed fails with `SQLITE_BUSY`
/// instead of waiting. An empty write to the tracking table takes the
/// database write lock up front, honouring the busy timeout.
pub(crate) async fn acquire<C: ConnectionTrait>(conn: &C, key: i64, table: &str) -> Result<(), DbErr> {
    match conn.get_database_backend() {
        DbBackend::Postgres => {
            conn.execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT pg_advisory_xact_lock($1)",
                [key.into()],
            ))
            .await?;
            tracing::debug!(key, "Advisory lock acquired");
        }
        DbBackend::Sqlite => {
            conn.execute(Statement::from_string(
                DbBackend::Sqlite,
                write_lock_statement(table),
            ))
            .await?;
            tracing::debug!(table, "Write lock acquired");
        }
        backend => {
            tracing::debug!(?backend, "No run lock for this backend");
        }
    }
    Ok(())
}

fn write_lock_statement(table: &str) -> String {
    format!(r#"DELETE FROM "{}" WHERE 0"#, table.replace('"', "\"\""))
}
