//! Migration: Link employees to user accounts.

use sea_orm_migration::prelude::*;

use super::set_null_reference;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let reference = set_null_reference(&Users::Table.to_string(), &Users::Id.to_string());

        manager
            .alter_table(
                Table::alter()
                    .table(Employees::Table)
                    .add_column(
                        ColumnDef::new(Employees::UserId)
                            .integer()
                            .null()
                            .extra(reference),
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
                    .drop_column(Employees::UserId)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
