//! Unit file templates.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use common::{AppError, AppResult};
use migration::{MigrationId, UnitKind};

/// Identity for a unit created at `now`: `{m|s}{YYYYMMDD}_{HHMMSS}_{name}`.
pub fn unit_identity(kind: UnitKind, name: &str, now: DateTime<Utc>) -> AppResult<MigrationId> {
    let prefix = match kind {
        UnitKind::Schema => 'm',
        UnitKind::Seed => 's',
    };
    let raw = format!("{}{}_{}", prefix, now.format("%Y%m%d_%H%M%S"), to_snake_case(name));

    MigrationId::parse(&raw).map_err(|e| AppError::validation(e.to_string()))
}

/// Write a new unit file into `dir` and return its path.
pub fn generate_unit(
    kind: UnitKind,
    name: &str,
    dir: &Path,
    now: DateTime<Utc>,
) -> AppResult<PathBuf> {
    let id = unit_identity(kind, name, now)?;
    let path = dir.join(format!("{}.rs", id));
    if path.exists() {
        return Err(AppError::validation(format!("{} already exists", path.display())));
    }

    let content = match kind {
        UnitKind::Schema => migration_template(&id),
        UnitKind::Seed => seed_template(&id),
    };
    write_file(&path, &content)?;

    Ok(path)
}

fn migration_template(id: &MigrationId) -> String {
    let description = id.description();
    let pascal_name = to_pascal_case(&table_name(description));

    format!(
        r#"//! Migration: {description}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {{
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {{
        manager
            .create_table(
                Table::create()
                    .table({pascal_name}::Table)
                    .col(
                        ColumnDef::new({pascal_name}::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new({pascal_name}::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new({pascal_name}::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }}

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {{
        manager
            .drop_table(Table::drop().table({pascal_name}::Table).to_owned())
            .await
    }}
}}

#[derive(DeriveIden)]
enum {pascal_name} {{
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
}}
"#
    )
}

fn seed_template(id: &MigrationId) -> String {
    let description = id.description();
    let pascal_name = to_pascal_case(&table_name(description));

    format!(
        r#"//! Seed: {description}

use sea_orm_migration::prelude::*;

use crate::seed::{{SeedRecordSet, SeedUnit}};

#[derive(DeriveMigrationName)]
pub struct Migration;

impl SeedUnit for Migration {{
    fn records(&self) -> SeedRecordSet {{
        SeedRecordSet::new({pascal_name}::Table, {pascal_name}::Name)
    }}
}}

#[derive(DeriveIden)]
enum {pascal_name} {{
    Table,
    Name,
}}
"#
    )
}

/// Table a unit description most likely targets, e.g.
/// `create_payroll_runs_table` -> `payroll_runs`.
fn table_name(description: &str) -> String {
    let trimmed = ["create_", "seed_", "add_", "drop_"]
        .iter()
        .find_map(|prefix| description.strip_prefix(prefix))
        .unwrap_or(description);
    let trimmed = trimmed.strip_suffix("_table").unwrap_or(trimmed);
    trimmed.to_string()
}

fn write_file(path: &Path, content: &str) -> AppResult<()> {
    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, content)?;
    Ok(())
}

/// Convert to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.trim().chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else if c == '-' || c.is_whitespace() {
            result.push('_');
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert to PascalCase
fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}
