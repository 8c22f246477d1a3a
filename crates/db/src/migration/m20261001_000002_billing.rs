//! Billing tables: statements, their charges, and meter readings.
//!
//! At most one statement exists per unit and billing month; the unique index
//! on (unit_id, period_start) is what serializes concurrent saves.

use sea_orm_migration::prelude::*;

use super::m20261001_000001_tenancy::{Leases, Units};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BillingStatements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BillingStatements::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BillingStatements::UnitId).uuid().not_null())
                    .col(ColumnDef::new(BillingStatements::LeaseId).uuid().not_null())
                    .col(ColumnDef::new(BillingStatements::PeriodStart).date().not_null())
                    .col(ColumnDef::new(BillingStatements::BillingDate).date().not_null())
                    .col(ColumnDef::new(BillingStatements::DueDate).date().not_null())
                    .col(money(BillingStatements::BaseRent))
                    .col(money(BillingStatements::WaterCost))
                    .col(money(BillingStatements::ElectricityCost))
                    .col(money(BillingStatements::TotalDue))
                    .col(money(BillingStatements::ComputedTotal))
                    .col(money(BillingStatements::AmountPaid))
                    .col(
                        ColumnDef::new(BillingStatements::Status)
                            .string_len(16)
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(
                        ColumnDef::new(BillingStatements::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BillingStatements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BillingStatements::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_billing_statements_unit")
                            .from(BillingStatements::Table, BillingStatements::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_billing_statements_lease")
                            .from(BillingStatements::Table, BillingStatements::LeaseId)
                            .to(Leases::Table, Leases::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_billing_statements_unit_period")
                    .table(BillingStatements::Table)
                    .col(BillingStatements::UnitId)
                    .col(BillingStatements::PeriodStart)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_billing_statements_due")
                    .table(BillingStatements::Table)
                    .col(BillingStatements::Status)
                    .col(BillingStatements::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BillingCharges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BillingCharges::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(BillingCharges::BillingId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BillingCharges::Category).string_len(16).not_null())
                    .col(ColumnDef::new(BillingCharges::Label).string_len(255).not_null())
                    .col(ColumnDef::new(BillingCharges::Amount).decimal_len(16, 4).not_null())
                    .col(ColumnDef::new(BillingCharges::Position).integer().not_null())
                    .col(
                        ColumnDef::new(BillingCharges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_billing_charges_statement")
                            .from(BillingCharges::Table, BillingCharges::BillingId)
                            .to(BillingStatements::Table, BillingStatements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_billing_charges_billing")
                    .table(BillingCharges::Table)
                    .col(BillingCharges::BillingId)
                    .col(BillingCharges::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MeterReadings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MeterReadings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MeterReadings::UnitId).uuid().not_null())
                    .col(ColumnDef::new(MeterReadings::Utility).string_len(16).not_null())
                    .col(ColumnDef::new(MeterReadings::ReadingDate).date().not_null())
                    .col(money(MeterReadings::PreviousReading))
                    .col(money(MeterReadings::CurrentReading))
                    .col(money(MeterReadings::Usage))
                    .col(ColumnDef::new(MeterReadings::Rate).decimal_len(16, 4).null())
                    .col(money(MeterReadings::Cost))
                    .col(
                        ColumnDef::new(MeterReadings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meter_readings_unit")
                            .from(MeterReadings::Table, MeterReadings::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Upsert target of the assembler
        manager
            .create_index(
                Index::create()
                    .name("uq_meter_readings_unit_utility_date")
                    .table(MeterReadings::Table)
                    .col(MeterReadings::UnitId)
                    .col(MeterReadings::Utility)
                    .col(MeterReadings::ReadingDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeterReadings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BillingCharges::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(BillingStatements::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

/// Non-null decimal amount column, zero by default.
fn money<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .decimal_len(16, 4)
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
enum BillingStatements {
    Table,
    Id,
    UnitId,
    LeaseId,
    PeriodStart,
    BillingDate,
    DueDate,
    BaseRent,
    WaterCost,
    ElectricityCost,
    TotalDue,
    ComputedTotal,
    AmountPaid,
    Status,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BillingCharges {
    Table,
    Id,
    BillingId,
    Category,
    Label,
    Amount,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MeterReadings {
    Table,
    Id,
    UnitId,
    Utility,
    ReadingDate,
    PreviousReading,
    CurrentReading,
    Usage,
    Rate,
    Cost,
    CreatedAt,
    UpdatedAt,
}
