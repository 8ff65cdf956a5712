//! Seed: Standard departments.

use domain::SEED_DEPARTMENT_NAMES;
use sea_orm_migration::prelude::*;

use crate::seed::{SeedRecordSet, SeedUnit};

#[derive(DeriveMigrationName)]
pub struct Migration;

impl SeedUnit for Migration {
    fn records(&self) -> SeedRecordSet {
        SEED_DEPARTMENT_NAMES
            .iter()
            .fold(
                SeedRecordSet::new(Departments::Table, Departments::Name),
                |set, name| set.key(*name),
            )
    }
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Name,
}
