//! Migration: Track employment status.
//!
//! The column only admits the stored strings of `EmployeeStatus` and new rows
//! start out as `Onboarding`.

use domain::{EmployeeStatus, STATUS_COLUMN_LENGTH};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Employees::Table)
                    .add_column(
                        ColumnDef::new(Employees::Status)
                            .string_len(STATUS_COLUMN_LENGTH)
                            .not_null()
                            .default(EmployeeStatus::default().as_str())
                            .check(Expr::col(Employees::Status).is_in(EmployeeStatus::allowed_values())),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Employees::Table)
                    .drop_column(Employees::Status)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Status,
}
