//! Errors raised while evolving the schema.

use common::AppError;
use sea_orm::DbErr;
use thiserror::Error;

use crate::identity::{join_ids, MigrationId};
use crate::plan::Direction;

/// Failure of a registry, store or runner operation.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// The database rejected a statement issued by a unit
    #[error("{direction} of {identity} failed: {source}")]
    SchemaOperation {
        identity: MigrationId,
        direction: Direction,
        #[source]
        source: DbErr,
    },

    /// The applied set is not a prefix of the ordered registry
    #[error(
        "{applied} is applied but earlier unit {pending} is not; \
         the history must be reconciled manually"
    )]
    OutOfOrderMigration {
        applied: MigrationId,
        pending: MigrationId,
    },

    /// Another writer already recorded this identity
    #[error("{identity} was already applied by another writer")]
    DuplicateApplication { identity: MigrationId },

    /// Another writer already removed this identity's record
    #[error("{identity} is not applied")]
    NotApplied { identity: MigrationId },

    /// A run stopped at its first failure
    #[error(
        "{direction} run failed at {failed} (completed: {}; skipped: {}; not run: {}): {source}",
        join_ids(.completed),
        join_ids(.skipped),
        join_ids(.not_run)
    )]
    PartialRun {
        direction: Direction,
        completed: Vec<MigrationId>,
        /// Units another writer handled earlier in the same run
        skipped: Vec<MigrationId>,
        failed: MigrationId,
        not_run: Vec<MigrationId>,
        #[source]
        source: Box<MigrationError>,
    },

    /// The store lists an identity that no registered unit carries
    #[error("{identity} is recorded as applied but no such unit is registered")]
    UnknownApplied { identity: MigrationId },

    #[error("No unit named {0} is registered")]
    UnknownIdentity(String),

    #[error("'{0}' is not a valid unit identity (expected m|s + YYYYMMDD_NNNNNN_description)")]
    InvalidIdentity(String),

    #[error("{0} is registered more than once")]
    DuplicateIdentity(MigrationId),

    /// The unit ran but its tracking record could not be written or committed
    #[error("recording {identity} failed: {source}")]
    RecordWrite {
        identity: MigrationId,
        #[source]
        source: DbErr,
    },

    /// The version store itself could not be read or created
    #[error("version store error: {0}")]
    Store(#[source] DbErr),

    #[error("invalid seed definition: {0}")]
    Seed(String),
}

impl MigrationError {
    /// Identity of the unit that failed, when the failure belongs to one
    pub fn failed_identity(&self) -> Option<&MigrationId> {
        match self {
            MigrationError::SchemaOperation { identity, .. }
            | MigrationError::DuplicateApplication { identity }
            | MigrationError::NotApplied { identity }
            | MigrationError::UnknownApplied { identity }
            | MigrationError::RecordWrite { identity, .. } => Some(identity),
            MigrationError::PartialRun { failed, .. } => Some(failed),
            MigrationError::OutOfOrderMigration { applied, .. } => Some(applied),
            MigrationError::DuplicateIdentity(identity) => Some(identity),
            _ => None,
        }
    }

    /// Another writer got there first; the outcome the run wanted already holds
    pub fn is_resolved_by_other_writer(&self) -> bool {
        matches!(
            self,
            MigrationError::DuplicateApplication { .. } | MigrationError::NotApplied { .. }
        )
    }
}

impl From<MigrationError> for AppError {
    fn from(err: MigrationError) -> Self {
        AppError::Migration(err.to_string())
    }
}

/// Result type alias for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;
