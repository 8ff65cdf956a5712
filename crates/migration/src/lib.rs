//! Schema evolution and reference-data seeding for the HR admin database.
//!
//! Units are SeaORM migrations named `m{YYYYMMDD}_{NNNNNN}_{description}`
//! (schema) or `s{YYYYMMDD}_{NNNNNN}_{description}` (seeds). A [`Runner`]
//! applies or reverts them one at a time, each in its own transaction with
//! its tracking record, and keeps schema and seed history in separate tables.

pub mod error;
pub mod identity;
mod lock;
pub mod migrations;
pub mod plan;
pub mod registry;
pub mod runner;
pub mod seed;
pub mod seeds;
pub mod store;

pub use error::{MigrationError, MigrationResult};
pub use identity::MigrationId;
pub use migrations::Migrator;
pub use plan::{Direction, UnitState, UnitStatus};
pub use registry::{Registry, UnitKind};
pub use runner::{RunReport, Runner, RunnerConfig};
pub use seed::{Seed, SeedRecordSet, SeedUnit};
pub use seeds::Seeder;
pub use store::{AppliedRecord, VersionStore};
