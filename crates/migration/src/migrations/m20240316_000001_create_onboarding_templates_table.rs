//! Migration: Create onboarding templates table.

use domain::TEMPLATE_CODE_LENGTH;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OnboardingTemplates::Table)
                    .col(
                        ColumnDef::new(OnboardingTemplates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OnboardingTemplates::TemplateCode)
                            .string_len(TEMPLATE_CODE_LENGTH)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(OnboardingTemplates::Name).string().not_null())
                    .col(ColumnDef::new(OnboardingTemplates::Description).text().null())
                    .col(
                        ColumnDef::new(OnboardingTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(OnboardingTemplates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OnboardingTemplates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OnboardingTemplates {
    Table,
    Id,
    TemplateCode,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}
