//! HR schema migrations.
//!
//! One module per unit; the module name is the unit identity,
//! `m{YYYYMMDD}_{NNNNNN}_{description}`. The first two units create the
//! tables the HR units build on.

use sea_orm_migration::prelude::*;

use crate::error::MigrationResult;
use crate::registry::{Registry, UnitKind};

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_employees_table;
mod m20240315_000001_create_departments_table;
mod m20240315_000002_add_user_id_to_employees;
mod m20240316_000001_create_onboarding_templates_table;
mod m20240317_000001_add_status_to_employees;

pub struct Migrator;

impl Migrator {
    pub fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_employees_table::Migration),
            Box::new(m20240315_000001_create_departments_table::Migration),
            Box::new(m20240315_000002_add_user_id_to_employees::Migration),
            Box::new(m20240316_000001_create_onboarding_templates_table::Migration),
            Box::new(m20240317_000001_add_status_to_employees::Migration),
        ]
    }

    /// Ordered registry of every schema migration.
    pub fn registry() -> MigrationResult<Registry> {
        Registry::new(UnitKind::Schema, Self::migrations())
    }
}

/// Inline `REFERENCES ... ON DELETE SET NULL` clause for a column added to an
/// existing table.
///
/// SQLite cannot attach a foreign key to an existing table, but it accepts a
/// column-level reference in `ADD COLUMN`, and so does PostgreSQL.
pub(crate) fn set_null_reference(table: &str, column: &str) -> String {
    format!(r#"REFERENCES "{table}" ("{column}") ON DELETE SET NULL"#)
}
