//! Reference-data seeds.
//!
//! Seeds are tracked apart from schema migrations and only run on demand.

use sea_orm_migration::MigrationTrait;

use crate::error::MigrationResult;
use crate::registry::{Registry, UnitKind};
use crate::seed::Seed;

mod s20240315_000001_seed_departments;

pub struct Seeder;

impl Seeder {
    pub fn seeds() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Seed(s20240315_000001_seed_departments::Migration))]
    }

    /// Ordered registry of every seed unit.
    pub fn registry() -> MigrationResult<Registry> {
        Registry::new(UnitKind::Seed, Self::seeds())
    }
}
