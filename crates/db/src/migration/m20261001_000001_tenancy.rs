//! Tenancy tables: properties, units, leases, and per-property utility rates.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Properties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Properties::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Properties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Units::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Units::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Units::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Units::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_units_property")
                            .from(Units::Table, Units::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Leases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Leases::UnitId).uuid().not_null())
                    .col(ColumnDef::new(Leases::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Leases::StartDate).date().not_null())
                    .col(ColumnDef::new(Leases::EndDate).date().null())
                    .col(ColumnDef::new(Leases::MonthlyRent).decimal_len(16, 4).not_null())
                    .col(
                        ColumnDef::new(Leases::AdvanceBalance)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Leases::DepositBalance)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Leases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Leases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leases_unit")
                            .from(Leases::Table, Leases::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leases_unit_status")
                    .table(Leases::Table)
                    .col(Leases::UnitId)
                    .col(Leases::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UtilityRates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UtilityRates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UtilityRates::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(UtilityRates::Utility).string_len(16).not_null())
                    .col(ColumnDef::new(UtilityRates::PeriodStart).date().not_null())
                    .col(ColumnDef::new(UtilityRates::Rate).decimal_len(16, 4).not_null())
                    .col(
                        ColumnDef::new(UtilityRates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UtilityRates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_utility_rates_property")
                            .from(UtilityRates::Table, UtilityRates::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One rate per property, utility and month
        manager
            .create_index(
                Index::create()
                    .name("uq_utility_rates_property_utility_period")
                    .table(UtilityRates::Table)
                    .col(UtilityRates::PropertyId)
                    .col(UtilityRates::Utility)
                    .col(UtilityRates::PeriodStart)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UtilityRates::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leases::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Units::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(super) enum Properties {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Units {
    Table,
    Id,
    PropertyId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Leases {
    Table,
    Id,
    UnitId,
    Status,
    StartDate,
    EndDate,
    MonthlyRent,
    AdvanceBalance,
    DepositBalance,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UtilityRates {
    Table,
    Id,
    PropertyId,
    Utility,
    PeriodStart,
    Rate,
    CreatedAt,
    UpdatedAt,
}
