//! Pure planning: which units a run touches, and in what order.
//!
//! Nothing here talks to the database. Given the same registry and the same
//! applied set, every function returns the same answer.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{MigrationError, MigrationResult};
use crate::identity::MigrationId;
use crate::store::AppliedRecord;

/// Direction a unit is executed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

/// State of one unit in one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum UnitState {
    Applied { applied_at: DateTime<Utc> },
    Pending,
    /// Recorded in the store but no longer registered
    Missing { applied_at: DateTime<Utc> },
}

/// A unit identity together with its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitStatus {
    pub identity: MigrationId,
    #[serde(flatten)]
    pub state: UnitState,
}

impl UnitStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self.state, UnitState::Applied { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, UnitState::Pending)
    }
}

/// Check that the applied identities form a prefix of the registry.
///
/// Both slices are expected in ascending order.
pub fn check_history(registered: &[MigrationId], applied: &[MigrationId]) -> MigrationResult<()> {
    let known: BTreeSet<&MigrationId> = registered.iter().collect();
    if let Some(unknown) = applied.iter().find(|id| !known.contains(id)) {
        return Err(MigrationError::UnknownApplied {
            identity: unknown.clone(),
        });
    }

    let applied_set: BTreeSet<&MigrationId> = applied.iter().collect();
    let first_pending = registered.iter().find(|id| !applied_set.contains(id));

    if let Some(pending) = first_pending {
        if let Some(later) = applied_set.range::<&MigrationId, _>(pending..).next() {
            return Err(MigrationError::OutOfOrderMigration {
                applied: (*later).clone(),
                pending: pending.clone(),
            });
        }
    }

    Ok(())
}

/// Units to run `up`, ascending, optionally stopping at `target` (inclusive).
pub fn plan_apply(
    registered: &[MigrationId],
    applied: &[MigrationId],
    target: Option<&MigrationId>,
) -> MigrationResult<Vec<MigrationId>> {
    check_history(registered, applied)?;

    if let Some(target) = target {
        if !registered.contains(target) {
            return Err(MigrationError::UnknownIdentity(target.to_string()));
        }
    }

    let applied_set: BTreeSet<&MigrationId> = applied.iter().collect();
    Ok(registered
        .iter()
        .filter(|id| !applied_set.contains(id))
        .filter(|id| target.map_or(true, |target| *id <= target))
        .cloned()
        .collect())
}

/// Units to run `down`: the `count` highest applied identities, descending.
pub fn plan_revert(
    registered: &[MigrationId],
    applied: &[MigrationId],
    count: usize,
) -> MigrationResult<Vec<MigrationId>> {
    check_history(registered, applied)?;

    let mut ordered = applied.to_vec();
    ordered.sort_unstable_by(|a, b| b.cmp(a));
    ordered.truncate(count);
    Ok(ordered)
}

/// Status of every registered unit, plus recorded units that are gone.
pub fn unit_statuses(registered: &[MigrationId], applied: &[AppliedRecord]) -> Vec<UnitStatus> {
    let mut statuses: Vec<UnitStatus> = registered
        .iter()
        .map(|id| {
            let state = applied
                .iter()
                .find(|record| &record.identity == id)
                .map_or(UnitState::Pending, |record| UnitState::Applied {
                    applied_at: record.applied_at,
                });
            UnitStatus {
                identity: id.clone(),
                state,
            }
        })
        .collect();

    statuses.extend(
        applied
            .iter()
            .filter(|record| !registered.contains(&record.identity))
            .map(|record| UnitStatus {
                identity: record.identity.clone(),
                state: UnitState::Missing {
                    applied_at: record.applied_at,
                },
            }),
    );

    statuses.sort_by(|a, b| a.identity.cmp(&b.identity));
    statuses
}
