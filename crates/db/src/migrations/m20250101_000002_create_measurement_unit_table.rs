//! Create measurement unit table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MeasurementUnit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeasurementUnit::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MeasurementUnit::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(MeasurementUnit::Abbreviation)
                            .string_len(64)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_measurement_unit_name")
                    .table(MeasurementUnit::Table)
                    .col(MeasurementUnit::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: abbreviation
        manager
            .create_index(
                Index::create()
                    .name("idx_measurement_unit_abbreviation")
                    .table(MeasurementUnit::Table)
                    .col(MeasurementUnit::Abbreviation)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeasurementUnit::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MeasurementUnit {
    Table,
    Id,
    Name,
    Abbreviation,
}
