//! `SeaORM` implementation of the billing store.
//!
//! Every operation runs on the open [`DatabaseTransaction`]; nothing touches
//! the pool until commit.

use chrono::{NaiveDate, Utc};
use leasehold_core::billing::{
    BillingError, BillingStore, BillingTx, Charge, LeaseRecord, MeterReadingRecord,
    StatementRecord, UtilityType,
};
use leasehold_shared::types::UnitId;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::convert::{lease_record, persistence, statement_record};
use crate::entities::{
    billing_charges, billing_statements, leases, meter_readings,
    sea_orm_active_enums::{BillingStatus, ChargeCategory, LeaseStatus, UtilityKind},
    units, utility_rates,
};

/// Opens billing transactions on a connection pool.
#[derive(Debug, Clone)]
pub struct SeaBillingStore {
    db: DatabaseConnection,
}

impl SeaBillingStore {
    /// Creates a new billing store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl BillingStore for SeaBillingStore {
    type Tx = SeaBillingTx;

    async fn begin(&self) -> Result<SeaBillingTx, BillingError> {
        let txn = self.db.begin().await.map_err(persistence)?;
        Ok(SeaBillingTx { txn })
    }
}

/// One billing transaction.
pub struct SeaBillingTx {
    txn: DatabaseTransaction,
}

impl BillingTx for SeaBillingTx {
    async fn find_lease_for_unit(
        &self,
        unit_id: UnitId,
    ) -> Result<Option<LeaseRecord>, BillingError> {
        // Active leases win over completed ones; latest start date first.
        for status in [LeaseStatus::Active, LeaseStatus::Completed] {
            let lease = leases::Entity::find()
                .filter(leases::Column::UnitId.eq(unit_id.into_inner()))
                .filter(leases::Column::Status.eq(status))
                .order_by_desc(leases::Column::StartDate)
                .one(&self.txn)
                .await
                .map_err(persistence)?;

            if let Some(lease) = lease {
                return Ok(Some(lease_record(lease)));
            }
        }

        Ok(None)
    }

    async fn find_rate(
        &self,
        unit_id: UnitId,
        utility: UtilityType,
        period_start: NaiveDate,
    ) -> Result<Option<Decimal>, BillingError> {
        let Some(unit) = units::Entity::find_by_id(unit_id.into_inner())
            .one(&self.txn)
            .await
            .map_err(persistence)?
        else {
            return Ok(None);
        };

        let rate = utility_rates::Entity::find()
            .filter(utility_rates::Column::PropertyId.eq(unit.property_id))
            .filter(utility_rates::Column::Utility.eq(UtilityKind::from(utility)))
            .filter(utility_rates::Column::PeriodStart.eq(period_start))
            .one(&self.txn)
            .await
            .map_err(persistence)?;

        Ok(rate.map(|r| r.rate))
    }

    async fn find_statement(
        &self,
        unit_id: UnitId,
        period_start: NaiveDate,
    ) -> Result<Option<StatementRecord>, BillingError> {
        let statement = billing_statements::Entity::find()
            .filter(billing_statements::Column::UnitId.eq(unit_id.into_inner()))
            .filter(billing_statements::Column::PeriodStart.eq(period_start))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(persistence)?;

        Ok(statement.map(statement_record))
    }

    async fn insert_statement(&self, statement: &StatementRecord) -> Result<(), BillingError> {
        let now = Utc::now().fixed_offset();
        let model = billing_statements::ActiveModel {
            id: Set(statement.id.clone()),
            unit_id: Set(statement.unit_id.into_inner()),
            lease_id: Set(statement.lease_id.into_inner()),
            period_start: Set(statement.period_start),
            billing_date: Set(statement.billing_date),
            due_date: Set(statement.due_date),
            base_rent: Set(statement.base_rent),
            water_cost: Set(statement.water_cost),
            electricity_cost: Set(statement.electricity_cost),
            total_due: Set(statement.total_due),
            computed_total: Set(statement.computed_total),
            amount_paid: Set(statement.amount_paid),
            status: Set(BillingStatus::from(statement.status)),
            paid_at: Set(statement.paid_at.map(|at| at.fixed_offset())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Conflicts on the id or on (unit_id, period_start) write nothing.
        let inserted = billing_statements::Entity::insert(model)
            .on_conflict(OnConflict::new().do_nothing().to_owned())
            .exec_without_returning(&self.txn)
            .await
            .map_err(persistence)?;

        if inserted == 0 {
            return Err(BillingError::DuplicateIdentifier(statement.id.clone()));
        }

        debug!(billing_id = %statement.id, "Inserted billing statement");
        Ok(())
    }

    async fn update_statement(&self, statement: &StatementRecord) -> Result<(), BillingError> {
        let model = billing_statements::ActiveModel {
            id: Unchanged(statement.id.clone()),
            unit_id: Set(statement.unit_id.into_inner()),
            lease_id: Set(statement.lease_id.into_inner()),
            period_start: Set(statement.period_start),
            billing_date: Set(statement.billing_date),
            due_date: Set(statement.due_date),
            base_rent: Set(statement.base_rent),
            water_cost: Set(statement.water_cost),
            electricity_cost: Set(statement.electricity_cost),
            total_due: Set(statement.total_due),
            computed_total: Set(statement.computed_total),
            // Payments own this column.
            amount_paid: NotSet,
            status: Set(BillingStatus::from(statement.status)),
            paid_at: Set(statement.paid_at.map(|at| at.fixed_offset())),
            created_at: NotSet,
            updated_at: Set(Utc::now().fixed_offset()),
        };

        billing_statements::Entity::update(model)
            .exec(&self.txn)
            .await
            .map_err(persistence)?;

        debug!(billing_id = %statement.id, "Updated billing statement");
        Ok(())
    }

    async fn upsert_meter_reading(&self, reading: &MeterReadingRecord) -> Result<(), BillingError> {
        let now = Utc::now().fixed_offset();
        let model = meter_readings::ActiveModel {
            id: Set(Uuid::now_v7()),
            unit_id: Set(reading.unit_id.into_inner()),
            utility: Set(UtilityKind::from(reading.utility)),
            reading_date: Set(reading.reading_date),
            previous_reading: Set(reading.previous_reading),
            current_reading: Set(reading.current_reading),
            usage: Set(reading.usage),
            rate: Set(reading.rate),
            cost: Set(reading.cost),
            created_at: Set(now),
            updated_at: Set(now),
        };

        meter_readings::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    meter_readings::Column::UnitId,
                    meter_readings::Column::Utility,
                    meter_readings::Column::ReadingDate,
                ])
                .update_columns([
                    meter_readings::Column::PreviousReading,
                    meter_readings::Column::CurrentReading,
                    meter_readings::Column::Usage,
                    meter_readings::Column::Rate,
                    meter_readings::Column::Cost,
                    meter_readings::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.txn)
            .await
            .map_err(persistence)?;

        Ok(())
    }

    async fn replace_charges(&self, billing_id: &str, charges: &[Charge]) -> Result<(), BillingError> {
        billing_charges::Entity::delete_many()
            .filter(billing_charges::Column::BillingId.eq(billing_id))
            .exec(&self.txn)
            .await
            .map_err(persistence)?;

        if charges.is_empty() {
            return Ok(());
        }

        let now = Utc::now().fixed_offset();
        let models = charges
            .iter()
            .zip(0i32..)
            .map(|(charge, position)| billing_charges::ActiveModel {
                id: Set(Uuid::now_v7()),
                billing_id: Set(billing_id.to_string()),
                category: Set(ChargeCategory::from(charge.category())),
                label: Set(charge.label().to_string()),
                amount: Set(charge.amount()),
                position: Set(position),
                created_at: Set(now),
            });

        billing_charges::Entity::insert_many(models)
            .exec_without_returning(&self.txn)
            .await
            .map_err(persistence)?;

        Ok(())
    }

    async fn commit(self) -> Result<(), BillingError> {
        self.txn.commit().await.map_err(persistence)
    }

    async fn rollback(self) -> Result<(), BillingError> {
        self.txn.rollback().await.map_err(persistence)
    }
}
