//! Migration runner.
//!
//! Applies pending units or reverts recent ones, strictly one at a time.
//! Each unit runs inside its own transaction together with its tracking
//! record, so the store always reflects exactly the units that completed.

use common::TrackingConfig;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use sea_orm_migration::{MigrationTrait, SchemaManager};
use serde::Serialize;

use crate::error::{MigrationError, MigrationResult};
use crate::identity::MigrationId;
use crate::lock;
use crate::plan::{self, Direction, UnitStatus};
use crate::registry::Registry;
use crate::store::{AppliedRecord, VersionStore};

/// Tracking table and lock key used by one runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub table: String,
    pub lock_key: i64,
}

impl RunnerConfig {
    /// Settings for schema migrations
    pub fn migrations(tracking: &TrackingConfig) -> Self {
        Self {
            table: tracking.migrations_table.clone(),
            lock_key: tracking.migrations_lock_key,
        }
    }

    /// Settings for seed units
    pub fn seeds(tracking: &TrackingConfig) -> Self {
        Self {
            table: tracking.seeds_table.clone(),
            lock_key: tracking.seeds_lock_key,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::migrations(&TrackingConfig::default())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub direction: Direction,
    /// Units this run executed, in execution order
    pub completed: Vec<MigrationId>,
    /// Units another writer handled between planning and execution
    pub skipped: Vec<MigrationId>,
}

impl RunReport {
    fn new(direction: Direction) -> Self {
        Self {
            direction,
            completed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.skipped.is_empty()
    }
}

enum UnitOutcome {
    Completed,
    Skipped,
}

/// Runs the units of one registry against one database.
pub struct Runner {
    db: DatabaseConnection,
    store: VersionStore,
    registry: Registry,
    lock_key: i64,
}

impl Runner {
    /// Create a runner over an already-resolved connection.
    pub fn new(db: DatabaseConnection, config: RunnerConfig, registry: Registry) -> Self {
        Self {
            db,
            store: VersionStore::new(config.table),
            registry,
            lock_key: config.lock_key,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    /// Applied records, creating the tracking table on first use.
    pub async fn applied(&self) -> MigrationResult<Vec<AppliedRecord>> {
        self.store.ensure_exists(&self.db).await?;
        self.store.list_applied(&self.db).await
    }

    async fn applied_ids(&self) -> MigrationResult<Vec<MigrationId>> {
        Ok(self
            .applied()
            .await?
            .into_iter()
            .map(|record| record.identity)
            .collect())
    }

    /// Every registered unit with its state.
    pub async fn status(&self) -> MigrationResult<Vec<UnitStatus>> {
        let applied = self.applied().await?;
        Ok(plan::unit_statuses(&self.registry.identities(), &applied))
    }

    /// Apply every pending unit.
    pub async fn apply_pending(&self) -> MigrationResult<RunReport> {
        self.apply_to(None).await
    }

    /// Apply pending units up to and including `target`.
    pub async fn apply_to(&self, target: Option<&MigrationId>) -> MigrationResult<RunReport> {
        let applied = self.applied_ids().await?;
        let pending = plan::plan_apply(&self.registry.identities(), &applied, target)?;

        if pending.is_empty() {
            tracing::info!(kind = %self.registry.kind(), "Nothing to apply");
        } else {
            tracing::info!(kind = %self.registry.kind(), count = pending.len(), "Applying pending units");
        }

        self.execute(Direction::Up, pending).await
    }

    /// Revert the `count` most recently applied units.
    pub async fn revert(&self, count: usize) -> MigrationResult<RunReport> {
        let applied = self.applied_ids().await?;
        let plan = plan::plan_revert(&self.registry.identities(), &applied, count)?;

        if plan.is_empty() {
            tracing::info!(kind = %self.registry.kind(), "Nothing to revert");
        } else {
            tracing::info!(kind = %self.registry.kind(), count = plan.len(), "Reverting units");
        }

        self.execute(Direction::Down, plan).await
    }

    /// Revert every applied unit.
    pub async fn revert_all(&self) -> MigrationResult<RunReport> {
        self.revert(usize::MAX).await
    }

    async fn execute(
        &self,
        direction: Direction,
        plan: Vec<MigrationId>,
    ) -> MigrationResult<RunReport> {
        let mut report = RunReport::new(direction);

        for (index, id) in plan.iter().enumerate() {
            match self.run_unit(id, direction).await {
                Ok(UnitOutcome::Completed) => {
                    tracing::info!(identity = %id, %direction, "Unit completed");
                    report.completed.push(id.clone());
                }
                Ok(UnitOutcome::Skipped) => {
                    tracing::warn!(identity = %id, %direction, "Unit already handled by another writer");
                    report.skipped.push(id.clone());
                }
                Err(source) => {
                    tracing::error!(identity = %id, %direction, error = %source, "Unit failed");
                    return Err(MigrationError::PartialRun {
                        direction,
                        completed: report.completed,
                        skipped: report.skipped,
                        failed: id.clone(),
                        not_run: plan[index + 1..].to_vec(),
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(report)
    }

    async fn run_unit(&self, id: &MigrationId, direction: Direction) -> MigrationResult<UnitOutcome> {
        let unit = self
            .registry
            .get(id)
            .ok_or_else(|| MigrationError::UnknownIdentity(id.to_string()))?;

        tracing::debug!(identity = %id, %direction, "Starting unit");
        let txn = self.db.begin().await.map_err(MigrationError::Store)?;

        match self.run_in_transaction(&txn, unit, id, direction).await {
            Ok(()) => {
                txn.commit()
                    .await
                    .map_err(|source| MigrationError::RecordWrite {
                        identity: id.clone(),
                        source,
                    })?;
                Ok(UnitOutcome::Completed)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(identity = %id, "Transaction rollback failed: {}", rollback_err);
                }
                if err.is_resolved_by_other_writer() {
                    Ok(UnitOutcome::Skipped)
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn run_in_transaction(
        &self,
        txn: &DatabaseTransaction,
        unit: &dyn MigrationTrait,
        id: &MigrationId,
        direction: Direction,
    ) -> MigrationResult<()> {
        lock::acquire(txn, self.lock_key, self.store.table())
            .await
            .map_err(MigrationError::Store)?;

        // The plan was computed before the lock; another runner may have moved on since.
        let applied = self.store.is_applied(txn, id).await?;
        match direction {
            Direction::Up if applied => {
                return Err(MigrationError::DuplicateApplication {
                    identity: id.clone(),
                })
            }
            Direction::Down if !applied => {
                return Err(MigrationError::NotApplied {
                    identity: id.clone(),
                })
            }
            _ => {}
        }

        let manager = SchemaManager::new(txn);
        let result = match direction {
            Direction::Up => unit.up(&manager).await,
            Direction::Down => unit.down(&manager).await,
        };
        result.map_err(|source| MigrationError::SchemaOperation {
            identity: id.clone(),
            direction,
            source,
        })?;

        match direction {
            Direction::Up => self.store.record_applied(txn, id).await,
            Direction::Down => self.store.record_reverted(txn, id).await,
        }
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("store", &self.store)
            .field("registry", &self.registry)
            .field("lock_key", &self.lock_key)
            .finish()
    }
}
